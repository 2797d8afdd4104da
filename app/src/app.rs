//! Terminal host: owns the engine and the reel view, routes commands and
//! engine events.

use std::fs;
use std::io::Write;

use chrono::Utc;
use raffle_abi::{Background, SettingsFlags};
use raffle_core::{
    EngineEvent, LoadSource, RaffleEngine, RaffleError, SpinConfig, StateStorage, TriggerOutcome,
};
use raffle_lib::{RaffleConfig, SystemRandom, WallClock, klog_info, klog_warn};
use raffle_video::ReelView;

use crate::commands::{Command, help_text, parse_command};
use crate::terminal::TerminalBackend;

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now_ms(&self) -> u64 {
        Utc::now().timestamp_millis().max(0) as u64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub type Engine<S> = RaffleEngine<S, SystemRandom, SystemClock>;

pub struct App<S: StateStorage, W: Write> {
    engine: Engine<S>,
    view: ReelView<TerminalBackend<W>>,
    status: String,
}

impl<S: StateStorage, W: Write> App<S, W> {
    pub fn new(storage: S, backend: TerminalBackend<W>, config: &RaffleConfig) -> Self {
        Self {
            engine: Engine::new(
                storage,
                SystemRandom,
                SystemClock,
                SpinConfig::with_item_height(config.item_height),
            ),
            view: ReelView::new(backend),
            status: String::new(),
        }
    }

    pub fn engine(&self) -> &Engine<S> {
        &self.engine
    }

    pub fn view(&self) -> &ReelView<TerminalBackend<W>> {
        &self.view
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.view.backend_mut().set_status(self.status.clone());
    }

    /// Load persisted state and paint the resting reel.
    pub fn start(&mut self, demo: bool) {
        let report = self.engine.load(demo);
        let stats = self.engine.stats();
        let mut status = match report.source {
            LoadSource::Restored => format!(
                "Restored {} participants, {} draws",
                stats.participants, stats.draws
            ),
            LoadSource::Demo => format!("Demo roster: {} participants", stats.participants),
            LoadSource::Empty => String::from("No participants; use 'import <file>'"),
        };
        if let Some(err) = report.storage_error {
            status.push_str(&format!(" (storage: {err})"));
        }
        self.view.set_background(&self.engine.store().settings().background);
        self.set_status(status);
        self.drain_events();
        self.redraw();
    }

    /// One display-refresh period.
    pub fn tick(&mut self) {
        self.engine.frame(&mut self.view);
        self.drain_events();
        if self.view.is_flashing() {
            self.engine.render(&mut self.view);
        }
        if let Some(err) = self.view.take_error() {
            klog_warn!("app: render failed: {}", err);
        }
    }

    fn redraw(&mut self) {
        if !self.engine.phase().is_animating() {
            self.engine.render(&mut self.view);
        }
    }

    fn drain_events(&mut self) {
        let events: Vec<EngineEvent> = self.engine.drain_events().collect();
        for event in events {
            match event {
                EngineEvent::SpinStarted { .. } => {
                    self.view.dismiss();
                    self.set_status("Spinning... press Enter to stop");
                }
                EngineEvent::DecelerationStarted { .. } => self.set_status("Slowing down..."),
                EngineEvent::Tick { .. } => {
                    if self.engine.store().settings().sound_enabled() {
                        self.view.backend_mut().ring_bell();
                    }
                }
                EngineEvent::Landed {
                    participant,
                    draw_number,
                } => {
                    let mode = self.engine.store().settings().display_mode;
                    let label = self
                        .engine
                        .store()
                        .participant(participant)
                        .map(|p| p.label(mode).to_string())
                        .unwrap_or_default();
                    self.view.announce(&label, draw_number);
                    self.set_status(format!("Winner #{draw_number}: {label}"));
                }
                EngineEvent::PersistFailed(err) => {
                    self.set_status(format!("Warning: changes not saved ({err})"));
                }
                EngineEvent::Reset => self.view.dismiss(),
            }
        }
    }

    pub fn handle_line(&mut self, line: &str) -> Flow {
        match parse_command(line) {
            Ok(cmd) => self.execute(cmd),
            Err(err) => {
                self.set_status(err.to_string());
                self.redraw();
                Flow::Continue
            }
        }
    }

    pub fn execute(&mut self, cmd: Command) -> Flow {
        let result = match cmd {
            Command::Quit => return Flow::Quit,
            Command::Trigger => self.trigger(),
            Command::Import(path) => self.import(&path),
            Command::Export(path) => self.export(&path),
            Command::ResetEligibility => self
                .engine
                .reset_eligibility()
                .map(|()| String::from("Eligibility restored")),
            Command::ClearWinners => self
                .engine
                .clear_winners()
                .map(|()| String::from("Winner history cleared")),
            Command::ResetAll => self
                .engine
                .reset_all()
                .map(|()| String::from("Everything cleared")),
            Command::Mode(mode) => self.update_settings(|s| s.display_mode = mode),
            Command::Reselect(on) => {
                self.update_settings(|s| s.flags.set(SettingsFlags::ALLOW_RESELECT, on))
            }
            Command::Sound(on) => self.update_settings(|s| s.flags.set(SettingsFlags::SOUND, on)),
            Command::Background(color) => self.update_settings(|s| {
                s.background = color.map_or(Background::Default, Background::Color)
            }),
            Command::Stats => {
                let stats = self.engine.stats();
                Ok(format!(
                    "{} participants, {} eligible, {} draws",
                    stats.participants, stats.eligible, stats.draws
                ))
            }
            Command::Help => {
                eprint!("{}", help_text());
                Ok(String::from("Help printed to stderr"))
            }
        };

        match result {
            Ok(status) if !status.is_empty() => self.set_status(status),
            Ok(_) => {}
            Err(err) => self.set_status(describe(&err)),
        }
        self.drain_events();
        self.redraw();
        Flow::Continue
    }

    fn trigger(&mut self) -> Result<String, RaffleError> {
        if let TriggerOutcome::Started { .. } = self.engine.trigger()? {
            klog_info!("app: spin started ({} eligible)", self.engine.stats().eligible);
        }
        Ok(String::new())
    }

    fn import(&mut self, path: &str) -> Result<String, RaffleError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => return Ok(format!("Cannot read {path}: {err}")),
        };
        let count = self.engine.import_text(&text)?;
        Ok(format!("Imported {count} participants from {path}"))
    }

    fn export(&mut self, path: &str) -> Result<String, RaffleError> {
        let csv = self.engine.export_csv(true);
        let count = self.engine.store().winners().len();
        Ok(match fs::write(path, csv) {
            Ok(()) => format!("Exported {count} winners to {path}"),
            Err(err) => format!("Cannot write {path}: {err}"),
        })
    }

    fn update_settings(
        &mut self,
        edit: impl FnOnce(&mut raffle_abi::Settings),
    ) -> Result<String, RaffleError> {
        let mut settings = self.engine.store().settings().clone();
        edit(&mut settings);
        self.view.set_background(&settings.background);
        self.engine.update_settings(settings)?;
        Ok(String::from("Settings saved"))
    }
}

fn describe(err: &RaffleError) -> String {
    match err {
        RaffleError::EmptyPool => {
            String::from("No eligible participants; 'reset' eligibility or 'import' a roster")
        }
        RaffleError::ImportEmpty => String::from("Import failed: no usable rows"),
        RaffleError::Busy => String::from("A draw is in progress"),
        RaffleError::Storage(err) => format!("Warning: changes not saved ({err})"),
    }
}
