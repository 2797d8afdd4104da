//! Canonical roster, winner history and settings, mirrored to a
//! [`StateStorage`] backend.
//!
//! Every mutating operation writes through before returning. A failed write
//! leaves the in-memory state changed (it stays authoritative for the
//! session) and is reported as [`RaffleError::Storage`].

use alloc::string::String;
use alloc::vec::Vec;

use raffle_abi::{Participant, Settings, WinnerRecord};
use raffle_lib::{RandomSource, klog_info, klog_warn};
use serde::Serialize;

use crate::demo;
use crate::error::{RaffleError, RaffleResult, StorageError, StorageResult};
use crate::selector::count_eligible;
use crate::storage::{
    KEY_DRAW_COUNTER, KEY_PARTICIPANTS, KEY_SETTINGS, KEY_WINNERS, StateStorage,
};

/// Number of participants generated for an empty store.
pub const DEMO_PARTICIPANTS: usize = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Doc {
    Participants,
    Winners,
    DrawCounter,
    Settings,
}

impl Doc {
    const fn key(self) -> &'static str {
        match self {
            Doc::Participants => KEY_PARTICIPANTS,
            Doc::Winners => KEY_WINNERS,
            Doc::DrawCounter => KEY_DRAW_COUNTER,
            Doc::Settings => KEY_SETTINGS,
        }
    }
}

/// Where the roster came from on load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadSource {
    Restored,
    Demo,
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadReport {
    pub source: LoadSource,
    /// First storage problem met while loading, if any. Loading never
    /// aborts on it.
    pub storage_error: Option<StorageError>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RosterStats {
    pub participants: usize,
    pub eligible: usize,
    pub draws: u32,
}

pub struct ParticipantStore<S: StateStorage> {
    storage: S,
    participants: Vec<Participant>,
    /// Most recent first.
    winners: Vec<WinnerRecord>,
    draw_counter: u32,
    settings: Settings,
}

impl<S: StateStorage> ParticipantStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            participants: Vec::new(),
            winners: Vec::new(),
            draw_counter: 0,
            settings: Settings::default(),
        }
    }

    /// Restore all four documents. When no roster survives and `demo` is
    /// given, the store is seeded with generated participants.
    pub fn load<R: RandomSource>(&mut self, demo: Option<&mut R>) -> LoadReport {
        let mut first_error = None;

        self.participants = self.read_doc(Doc::Participants, &mut first_error).unwrap_or_default();
        self.winners = self.read_doc(Doc::Winners, &mut first_error).unwrap_or_default();
        self.draw_counter = self.read_doc(Doc::DrawCounter, &mut first_error).unwrap_or(0);
        self.settings = self.read_doc(Doc::Settings, &mut first_error).unwrap_or_default();

        // History newer than the counter means the counter write was lost.
        if let Some(latest) = self.winners.first() {
            self.draw_counter = self.draw_counter.max(latest.draw_number);
        }

        let source = if !self.participants.is_empty() {
            klog_info!(
                "store: restored {} participants, {} winners",
                self.participants.len(),
                self.winners.len()
            );
            LoadSource::Restored
        } else if let Some(rng) = demo {
            self.participants = demo::generate(DEMO_PARTICIPANTS, rng);
            self.winners.clear();
            self.draw_counter = 0;
            klog_info!("store: seeded {} demo participants", self.participants.len());
            if let Err(err) = self.persist(&[
                Doc::Participants,
                Doc::Winners,
                Doc::DrawCounter,
            ]) {
                first_error.get_or_insert(err);
            }
            LoadSource::Demo
        } else {
            LoadSource::Empty
        };

        LoadReport {
            source,
            storage_error: first_error,
        }
    }

    fn read_doc<T: serde::de::DeserializeOwned>(
        &self,
        doc: Doc,
        first_error: &mut Option<StorageError>,
    ) -> Option<T> {
        let key = doc.key();
        let raw = match self.storage.load(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                klog_warn!("store: reading '{}' failed: {}", key, err);
                first_error.get_or_insert(err);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(_) => {
                let err = StorageError::Corrupt { key };
                klog_warn!("store: {}", err);
                first_error.get_or_insert(err);
                None
            }
        }
    }

    fn encode<T: Serialize + ?Sized>(key: &'static str, value: &T) -> Result<String, StorageError> {
        serde_json::to_string(value).map_err(|_| StorageError::Encode { key })
    }

    /// Write the given documents in one batch.
    pub(crate) fn persist(&mut self, docs: &[Doc]) -> StorageResult {
        let mut batch: Vec<(&'static str, String)> = Vec::with_capacity(docs.len());
        for &doc in docs {
            let key = doc.key();
            let encoded = match doc {
                Doc::Participants => Self::encode(key, &self.participants),
                Doc::Winners => Self::encode(key, &self.winners),
                Doc::DrawCounter => Self::encode(key, &self.draw_counter),
                Doc::Settings => Self::encode(key, &self.settings),
            };
            match encoded {
                Ok(value) => batch.push((key, value)),
                Err(err) => return Err(Self::report(err)),
            }
        }
        self.storage
            .store_batch(&batch)
            .map_err(Self::report)
    }

    fn report(err: StorageError) -> StorageError {
        klog_warn!("store: {}; continuing with in-memory state", err);
        err
    }

    /// Install a freshly imported roster. Prior draws no longer apply, so the
    /// history and counter are cleared as well.
    pub fn replace_all(&mut self, participants: Vec<Participant>) -> RaffleResult {
        self.participants = participants;
        self.winners.clear();
        self.draw_counter = 0;
        klog_info!("store: roster replaced ({} participants)", self.participants.len());
        self.persist(&[Doc::Participants, Doc::Winners, Doc::DrawCounter])
            .map_err(RaffleError::from)
    }

    /// Give every participant back the eligibility their tickets grant.
    /// History is untouched.
    pub fn reset_eligibility(&mut self) -> RaffleResult {
        for p in self.participants.iter_mut() {
            p.reset_eligibility();
        }
        self.persist(&[Doc::Participants]).map_err(RaffleError::from)
    }

    /// Start a new round: empty the history, restart numbering and restore
    /// eligibility.
    pub fn clear_winners(&mut self) -> RaffleResult {
        for p in self.participants.iter_mut() {
            p.reset_eligibility();
        }
        self.winners.clear();
        self.draw_counter = 0;
        klog_info!("store: winners cleared");
        self.persist(&[Doc::Participants, Doc::Winners, Doc::DrawCounter])
            .map_err(RaffleError::from)
    }

    /// Drop roster, history and counter. Settings survive.
    pub fn reset_all(&mut self) -> RaffleResult {
        self.participants.clear();
        self.winners.clear();
        self.draw_counter = 0;
        klog_info!("store: full reset");
        self.persist(&[Doc::Participants, Doc::Winners, Doc::DrawCounter])
            .map_err(RaffleError::from)
    }

    pub fn set_settings(&mut self, settings: Settings) -> RaffleResult {
        self.settings = settings;
        self.persist(&[Doc::Settings]).map_err(RaffleError::from)
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, index: usize) -> Option<&Participant> {
        self.participants.get(index)
    }

    pub(crate) fn participant_mut(&mut self, index: usize) -> Option<&mut Participant> {
        self.participants.get_mut(index)
    }

    pub fn winners(&self) -> &[WinnerRecord] {
        &self.winners
    }

    pub(crate) fn push_winner(&mut self, record: WinnerRecord) {
        self.draw_counter = record.draw_number;
        self.winners.insert(0, record);
    }

    pub fn draw_counter(&self) -> u32 {
        self.draw_counter
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn count_eligible(&self) -> usize {
        count_eligible(&self.participants)
    }

    pub fn stats(&self) -> RosterStats {
        RosterStats {
            participants: self.participants.len(),
            eligible: self.count_eligible(),
            draws: self.draw_counter,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}
