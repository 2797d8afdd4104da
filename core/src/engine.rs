//! The composed raffle engine.
//!
//! One [`RaffleEngine`] owns the roster, the reel, the physics and the frame
//! scheduler. The host constructs it once and drives it from two entry
//! points: [`RaffleEngine::trigger`] for the single user action and
//! [`RaffleEngine::frame`] from its display-refresh callback. Rendering goes
//! out through the narrow [`PoolSink`] interface so the engine runs headless.

use alloc::string::String;
use alloc::vec::Vec;

use raffle_abi::{DisplayMode, Participant, Settings, SpinPhase, WinnerRecord, POOL_SIZE};
use raffle_lib::ring_buffer::Drain;
use raffle_lib::{RandomSource, RingBuffer, WallClock, klog_debug, klog_info, klog_warn};

use crate::error::{RaffleError, RaffleResult, StorageError};
use crate::export::winners_to_csv;
use crate::frame::FrameScheduler;
use crate::import;
use crate::recorder::commit_draw;
use crate::reel::{PoolFrame, VirtualReel};
use crate::selector::select_winner;
use crate::spin::{SpinConfig, SpinController};
use crate::storage::StateStorage;
use crate::store::{LoadReport, ParticipantStore, RosterStats};

pub const EVENT_QUEUE_DEPTH: usize = 64;

/// Notifications for the presentation layer, drained once per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EngineEvent {
    SpinStarted { winner: usize },
    DecelerationStarted { slot: i64 },
    /// At least one item boundary passed the center this frame.
    Tick { slot: i64, crossed: u32 },
    Landed { participant: usize, draw_number: u32 },
    PersistFailed(StorageError),
    /// Animation stopped and the roster changed under it.
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerOutcome {
    Started { winner: usize },
    Decelerating { slot: i64 },
    /// The current phase does not accept the trigger.
    Ignored,
}

/// Read-only view handed to the renderer for one frame.
pub struct PoolView<'a> {
    pub frame: &'a PoolFrame,
    pub phase: SpinPhase,
    participants: &'a [Participant],
    mode: DisplayMode,
}

impl<'a> PoolView<'a> {
    pub fn participant(&self, element: usize) -> Option<&'a Participant> {
        self.frame
            .entries
            .get(element)
            .copied()
            .flatten()
            .and_then(|idx| self.participants.get(idx))
    }

    /// Text for pool element `element`; empty when the slot has no entry.
    pub fn label(&self, element: usize) -> &'a str {
        self.participant(element)
            .map(|p| p.label(self.mode))
            .unwrap_or("")
    }

    pub fn labels(&self) -> [&'a str; POOL_SIZE] {
        core::array::from_fn(|i| self.label(i))
    }
}

/// Receiver of rendered frames.
pub trait PoolSink {
    fn present(&mut self, view: &PoolView<'_>);
}

pub struct RaffleEngine<S: StateStorage, R: RandomSource, C: WallClock> {
    store: ParticipantStore<S>,
    rng: R,
    clock: C,
    reel: VirtualReel,
    spin: SpinController,
    scheduler: FrameScheduler,
    events: RingBuffer<EngineEvent, EVENT_QUEUE_DEPTH>,
    /// Chosen at spin start; fixed for the whole spin.
    pending_winner: Option<usize>,
    last_draw: Option<WinnerRecord>,
}

impl<S: StateStorage, R: RandomSource, C: WallClock> RaffleEngine<S, R, C> {
    pub fn new(storage: S, rng: R, clock: C, config: SpinConfig) -> Self {
        Self {
            store: ParticipantStore::new(storage),
            rng,
            clock,
            reel: VirtualReel::new(config.item_height),
            spin: SpinController::new(config),
            scheduler: FrameScheduler::new(),
            events: RingBuffer::new_with(EngineEvent::Reset),
            pending_winner: None,
            last_draw: None,
        }
    }

    /// Restore persisted state, seeding demo participants into an empty
    /// store when `demo` is set. Any spin in flight is cancelled first.
    pub fn load(&mut self, demo: bool) -> LoadReport {
        self.stop_animation();
        let report = if demo {
            self.store.load(Some(&mut self.rng))
        } else {
            self.store.load::<R>(None)
        };
        if let Some(err) = report.storage_error {
            self.emit(EngineEvent::PersistFailed(err));
        }
        self.rebuild_reel();
        report
    }

    // ------------------------------------------------------------------
    // Trigger handling
    // ------------------------------------------------------------------

    /// The single user action: starts a spin when at rest, requests
    /// deceleration while spinning, and is ignored while decelerating.
    pub fn trigger(&mut self) -> RaffleResult<TriggerOutcome> {
        match self.spin.phase() {
            SpinPhase::Idle | SpinPhase::Stopped => {
                self.start_spin().map(|winner| TriggerOutcome::Started { winner })
            }
            SpinPhase::Spinning => Ok(self
                .request_deceleration()
                .map_or(TriggerOutcome::Ignored, |slot| TriggerOutcome::Decelerating { slot })),
            SpinPhase::Decelerating => Ok(TriggerOutcome::Ignored),
        }
    }

    /// Select the winner and start spinning. The winner never changes after
    /// this returns; only the slot it lands on is decided later.
    pub fn start_spin(&mut self) -> RaffleResult<usize> {
        if self.spin.phase().is_animating() {
            return Err(RaffleError::Busy);
        }
        let Some(winner) = select_winner(self.store.participants(), &mut self.rng) else {
            klog_info!("engine: spin refused, no eligible participants");
            return Err(RaffleError::EmptyPool);
        };

        self.reel.build_cycle(self.store.participants().len(), &mut self.rng);
        self.pending_winner = Some(winner);
        self.last_draw = None;
        self.spin.start();
        self.scheduler.request();
        self.emit(EngineEvent::SpinStarted { winner });
        klog_debug!("engine: spin started, winner index {}", winner);
        Ok(winner)
    }

    /// Pin the winner to a slot ahead of the center and begin the glide.
    /// No-op outside the spinning phase.
    pub fn request_deceleration(&mut self) -> Option<i64> {
        let winner = self.pending_winner?;
        let slot = self.spin.request_deceleration()?;
        self.reel.fix_winner(slot, winner);
        self.emit(EngineEvent::DecelerationStarted { slot });
        klog_debug!(
            "engine: decelerating onto slot {} (target {:?})",
            slot,
            self.spin.target()
        );
        Some(slot)
    }

    // ------------------------------------------------------------------
    // Frame loop
    // ------------------------------------------------------------------

    /// Display-refresh callback. Runs one physics step and renders it if a
    /// frame is pending; returns whether anything happened.
    pub fn frame<P: PoolSink + ?Sized>(&mut self, sink: &mut P) -> bool {
        if self.scheduler.take_due().is_none() {
            return false;
        }
        let Some(step) = self.spin.step() else {
            return false;
        };

        let frame = self.reel.render_window(step.position);
        self.present(sink, &frame);
        if step.ticked() {
            self.emit(EngineEvent::Tick {
                slot: step.center_slot,
                crossed: step.crossed,
            });
        }

        if step.landed {
            self.finish_spin();
        } else {
            self.scheduler.request();
        }
        true
    }

    fn finish_spin(&mut self) {
        let Some(winner) = self.pending_winner.take() else {
            return;
        };
        let now = self.clock.now_ms();
        let Some(draw) = commit_draw(&mut self.store, winner, now) else {
            return;
        };
        self.emit(EngineEvent::Landed {
            participant: draw.participant,
            draw_number: draw.record.draw_number,
        });
        if let Some(err) = draw.persist_error {
            self.emit(EngineEvent::PersistFailed(err));
        }
        klog_info!("engine: landed, draw #{}", draw.record.draw_number);
        self.last_draw = Some(draw.record);
    }

    /// Redraw the pool at the current position without advancing physics.
    pub fn render<P: PoolSink + ?Sized>(&self, sink: &mut P) {
        let frame = self.current_frame();
        self.present(sink, &frame);
    }

    fn present<P: PoolSink + ?Sized>(&self, sink: &mut P, frame: &PoolFrame) {
        let view = PoolView {
            frame,
            phase: self.spin.phase(),
            participants: self.store.participants(),
            mode: self.store.settings().display_mode,
        };
        sink.present(&view);
    }

    pub fn current_frame(&self) -> PoolFrame {
        self.reel.render_window(self.spin.position())
    }

    // ------------------------------------------------------------------
    // Roster and settings mutation
    // ------------------------------------------------------------------

    /// Cancel the frame chain and return the reel to rest. Runs before any
    /// roster mutation so no pending callback can render a changed roster.
    fn stop_animation(&mut self) {
        if self.spin.phase().is_animating() {
            klog_warn!("engine: in-flight spin cancelled");
        }
        self.scheduler.cancel();
        self.spin.reset();
        self.pending_winner = None;
        self.last_draw = None;
    }

    fn rebuild_reel(&mut self) {
        self.reel.build_cycle(self.store.participants().len(), &mut self.rng);
    }

    fn after_reset(&mut self, result: RaffleResult) -> RaffleResult {
        self.rebuild_reel();
        self.emit(EngineEvent::Reset);
        if let Err(RaffleError::Storage(err)) = result {
            self.emit(EngineEvent::PersistFailed(err));
        }
        result
    }

    /// Install a new roster; prior draws are discarded.
    pub fn replace_all(&mut self, participants: Vec<Participant>) -> RaffleResult {
        self.stop_animation();
        let result = self.store.replace_all(participants);
        self.after_reset(result)
    }

    /// Parse delimited text and install it as the roster. Nothing changes
    /// unless parsing yields at least one participant. Returns the number of
    /// participants imported.
    pub fn import_text(&mut self, text: &str) -> RaffleResult<usize> {
        let participants = import::import_text(text)?;
        let count = participants.len();
        self.replace_all(participants)?;
        Ok(count)
    }

    pub fn reset_eligibility(&mut self) -> RaffleResult {
        self.stop_animation();
        let result = self.store.reset_eligibility();
        self.after_reset(result)
    }

    pub fn clear_winners(&mut self) -> RaffleResult {
        self.stop_animation();
        let result = self.store.clear_winners();
        self.after_reset(result)
    }

    pub fn reset_all(&mut self) -> RaffleResult {
        self.stop_animation();
        let result = self.store.reset_all();
        self.after_reset(result)
    }

    pub fn update_settings(&mut self, settings: Settings) -> RaffleResult {
        let result = self.store.set_settings(settings);
        if let Err(RaffleError::Storage(err)) = result {
            self.emit(EngineEvent::PersistFailed(err));
        }
        result
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    fn emit(&mut self, event: EngineEvent) {
        if self.events.push_overwrite(event) {
            klog_debug!("engine: event queue full, oldest event dropped");
        }
    }

    pub fn drain_events(&mut self) -> Drain<'_, EngineEvent, EVENT_QUEUE_DEPTH> {
        self.events.drain()
    }

    pub fn export_csv(&self, bom: bool) -> String {
        winners_to_csv(self.store.winners(), bom)
    }

    pub fn phase(&self) -> SpinPhase {
        self.spin.phase()
    }

    pub fn position(&self) -> f64 {
        self.spin.position()
    }

    pub fn velocity(&self) -> f64 {
        self.spin.velocity()
    }

    pub fn winner_slot(&self) -> Option<i64> {
        self.reel.winner_slot()
    }

    pub fn pending_winner(&self) -> Option<usize> {
        self.pending_winner
    }

    pub fn last_draw(&self) -> Option<&WinnerRecord> {
        self.last_draw.as_ref()
    }

    /// Whether the trigger would start a spin right now.
    pub fn can_draw(&self) -> bool {
        !self.spin.phase().is_animating() && self.store.count_eligible() > 0
    }

    pub fn frame_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn stats(&self) -> RosterStats {
        self.store.stats()
    }

    pub fn store(&self) -> &ParticipantStore<S> {
        &self.store
    }

    /// The persistence backend. The roster itself is only reachable through
    /// the engine's reset operations.
    pub fn storage_mut(&mut self) -> &mut S {
        self.store.storage_mut()
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
