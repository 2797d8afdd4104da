//! Frame-driven spin physics.
//!
//! ```text
//!   idle ──trigger──▶ spinning ──trigger──▶ decelerating ──snap──▶ stopped
//!                        ▲                                            │
//!                        └───────────────────trigger──────────────────┘
//! ```
//!
//! Motion is computed per frame, never from wall-clock time: while spinning
//! the position advances by a constant velocity; while decelerating the
//! velocity is a fixed fraction of the remaining distance, so the glide is an
//! exponential decay that takes roughly the same number of frames from any
//! starting speed. The last sub-unit gap is closed by snapping exactly onto
//! the target.

use raffle_abi::SpinPhase;

use crate::reel::logical_slot_at;

pub const DEFAULT_ITEM_HEIGHT: f64 = 120.0;
pub const DEFAULT_SPIN_VELOCITY: f64 = 40.0;
pub const DEFAULT_DECEL_ITEMS: i64 = 40;
pub const DEFAULT_DECAY: f64 = 0.035;
pub const DEFAULT_MIN_VELOCITY: f64 = 0.5;
pub const DEFAULT_SNAP_DISTANCE: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinConfig {
    /// Height of one reel item; positions are measured in the same unit.
    pub item_height: f64,
    /// Per-frame advance during the constant-speed phase.
    pub spin_velocity: f64,
    /// Items between the center at deceleration start and the winner slot.
    pub decel_items: i64,
    /// Fraction of the remaining distance covered per decelerating frame.
    pub decay: f64,
    /// Floor for the decelerating velocity so the glide terminates.
    pub min_velocity: f64,
    /// Remaining distance under which the reel snaps onto the target.
    pub snap_distance: f64,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            item_height: DEFAULT_ITEM_HEIGHT,
            spin_velocity: DEFAULT_SPIN_VELOCITY,
            decel_items: DEFAULT_DECEL_ITEMS,
            decay: DEFAULT_DECAY,
            min_velocity: DEFAULT_MIN_VELOCITY,
            snap_distance: DEFAULT_SNAP_DISTANCE,
        }
    }
}

impl SpinConfig {
    pub fn with_item_height(item_height: f64) -> Self {
        Self {
            item_height,
            ..Self::default()
        }
    }
}

/// Result of one physics frame. Rendering and the tick sound both use
/// `position` from here so they agree on what the frame showed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStep {
    pub position: f64,
    pub center_slot: i64,
    /// Item boundaries crossed during this frame.
    pub crossed: u32,
    /// This frame snapped onto the target and entered `Stopped`.
    pub landed: bool,
}

impl FrameStep {
    #[inline]
    pub fn ticked(&self) -> bool {
        self.crossed > 0
    }
}

#[derive(Debug, Clone)]
pub struct SpinController {
    config: SpinConfig,
    phase: SpinPhase,
    position: f64,
    velocity: f64,
    target: Option<f64>,
    winner_slot: Option<i64>,
}

impl SpinController {
    pub fn new(config: SpinConfig) -> Self {
        Self {
            config,
            phase: SpinPhase::Idle,
            position: 0.0,
            velocity: 0.0,
            target: None,
            winner_slot: None,
        }
    }

    pub fn config(&self) -> &SpinConfig {
        &self.config
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn target(&self) -> Option<f64> {
        self.target
    }

    pub fn winner_slot(&self) -> Option<i64> {
        self.winner_slot
    }

    pub fn center_slot(&self) -> i64 {
        logical_slot_at(self.position, self.config.item_height)
    }

    /// Enter `Spinning` from `Idle` or `Stopped`. Returns `false` (and
    /// changes nothing) while a spin is already in flight.
    pub fn start(&mut self) -> bool {
        if self.phase.is_animating() {
            return false;
        }
        self.phase = SpinPhase::Spinning;
        self.velocity = self.config.spin_velocity;
        self.target = None;
        self.winner_slot = None;
        true
    }

    /// Fix the landing slot a constant distance ahead of the current center
    /// and begin the glide. Only valid while spinning; any other phase is a
    /// no-op returning `None`.
    pub fn request_deceleration(&mut self) -> Option<i64> {
        if self.phase != SpinPhase::Spinning {
            return None;
        }
        let slot = self.center_slot() + self.config.decel_items;
        self.winner_slot = Some(slot);
        self.target = Some(slot as f64 * self.config.item_height);
        self.phase = SpinPhase::Decelerating;
        Some(slot)
    }

    /// Advance one frame. Returns `None` outside the animating phases.
    pub fn step(&mut self) -> Option<FrameStep> {
        let before = self.center_slot();
        let mut landed = false;

        match self.phase {
            SpinPhase::Spinning => {
                self.position += self.velocity;
            }
            SpinPhase::Decelerating => {
                let target = self.target.unwrap_or(self.position);
                let remaining = target - self.position;
                self.velocity = (remaining * self.config.decay).max(self.config.min_velocity);
                let next = self.position + self.velocity;
                if target - next < self.config.snap_distance {
                    self.position = target;
                    self.velocity = 0.0;
                    self.phase = SpinPhase::Stopped;
                    landed = true;
                } else {
                    self.position = next;
                }
            }
            SpinPhase::Idle | SpinPhase::Stopped => return None,
        }

        let center_slot = self.center_slot();
        Some(FrameStep {
            position: self.position,
            center_slot,
            crossed: (center_slot - before).max(0) as u32,
            landed,
        })
    }

    /// Back to `Idle` at the origin.
    pub fn reset(&mut self) {
        self.phase = SpinPhase::Idle;
        self.position = 0.0;
        self.velocity = 0.0;
        self.target = None;
        self.winner_slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_stop(spin: &mut SpinController) -> u32 {
        let mut frames = 0;
        while let Some(step) = spin.step() {
            frames += 1;
            if step.landed {
                break;
            }
            assert!(frames < 10_000, "glide did not terminate");
        }
        frames
    }

    #[test]
    fn deceleration_outside_spinning_is_ignored() {
        let mut spin = SpinController::new(SpinConfig::default());
        assert_eq!(spin.request_deceleration(), None);
        assert_eq!(spin.phase(), SpinPhase::Idle);
        assert!(spin.step().is_none());
    }

    #[test]
    fn second_deceleration_request_changes_nothing() {
        let mut spin = SpinController::new(SpinConfig::default());
        assert!(spin.start());
        for _ in 0..10 {
            spin.step();
        }
        let slot = spin.request_deceleration().unwrap();
        let position = spin.position();
        assert_eq!(spin.request_deceleration(), None);
        assert_eq!(spin.phase(), SpinPhase::Decelerating);
        assert_eq!(spin.position(), position);
        assert_eq!(spin.winner_slot(), Some(slot));
    }

    #[test]
    fn start_is_refused_mid_spin() {
        let mut spin = SpinController::new(SpinConfig::default());
        assert!(spin.start());
        spin.step();
        let position = spin.position();
        assert!(!spin.start());
        assert_eq!(spin.position(), position);
    }

    #[test]
    fn spinning_moves_at_constant_speed() {
        let mut spin = SpinController::new(SpinConfig::default());
        spin.start();
        let first = spin.step().unwrap();
        let second = spin.step().unwrap();
        assert_eq!(first.position, DEFAULT_SPIN_VELOCITY);
        assert_eq!(second.position, 2.0 * DEFAULT_SPIN_VELOCITY);
    }

    #[test]
    fn glide_lands_exactly_and_monotonically() {
        for item_height in [1.0, 7.5, 64.0, 120.0, 333.3] {
            let mut spin = SpinController::new(SpinConfig::with_item_height(item_height));
            spin.start();
            for _ in 0..37 {
                spin.step();
            }
            let slot = spin.request_deceleration().unwrap();
            let mut last = spin.position();
            while let Some(step) = spin.step() {
                assert!(step.position >= last);
                last = step.position;
                if step.landed {
                    break;
                }
            }
            assert_eq!(spin.phase(), SpinPhase::Stopped);
            assert_eq!(spin.position(), slot as f64 * item_height);
            assert_eq!(spin.center_slot(), slot);
        }
    }

    #[test]
    fn glide_length_is_roughly_constant() {
        // Frame-based decay: about 3 s at 60 fps regardless of where the
        // glide started.
        let mut counts = alloc::vec::Vec::new();
        for warmup in [1, 50, 500] {
            let mut spin = SpinController::new(SpinConfig::default());
            spin.start();
            for _ in 0..warmup {
                spin.step();
            }
            spin.request_deceleration();
            counts.push(run_to_stop(&mut spin));
        }
        for &frames in &counts {
            assert!((150..=260).contains(&frames), "glide took {} frames", frames);
        }
        let spread = counts.iter().max().unwrap() - counts.iter().min().unwrap();
        assert!(spread <= 2);
    }

    #[test]
    fn boundaries_crossed_are_reported() {
        let mut spin = SpinController::new(SpinConfig::with_item_height(100.0));
        spin.start();
        let step = spin.step().unwrap();
        assert!(!step.ticked());
        spin.step();
        let step = spin.step().unwrap();
        assert_eq!(step.position, 120.0);
        assert_eq!(step.crossed, 1);
    }

    #[test]
    fn glide_ticks_through_every_item_including_the_snap() {
        let mut spin = SpinController::new(SpinConfig::default());
        spin.start();
        for _ in 0..12 {
            spin.step();
        }
        spin.request_deceleration().unwrap();
        let mut crossed = 0;
        let last = loop {
            let step = spin.step().unwrap();
            crossed += step.crossed;
            if step.landed {
                break step;
            }
        };
        assert!(last.crossed >= 1);
        assert_eq!(i64::from(crossed), DEFAULT_DECEL_ITEMS);
    }

    #[test]
    fn restart_after_stop() {
        let mut spin = SpinController::new(SpinConfig::default());
        spin.start();
        spin.step();
        spin.request_deceleration();
        run_to_stop(&mut spin);
        assert!(spin.start());
        assert_eq!(spin.winner_slot(), None);
        assert_eq!(spin.phase(), SpinPhase::Spinning);
    }
}
