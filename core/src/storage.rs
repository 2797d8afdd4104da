//! Persistence seam.
//!
//! The store writes four logical documents. A backend only has to map keys
//! to strings and apply a batch; the encoding is owned by [`crate::store`].

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::error::{StorageError, StorageResult};

pub const KEY_PARTICIPANTS: &str = "participants";
pub const KEY_WINNERS: &str = "winners";
pub const KEY_DRAW_COUNTER: &str = "draw_counter";
pub const KEY_SETTINGS: &str = "settings";

pub const ALL_KEYS: [&str; 4] = [KEY_PARTICIPANTS, KEY_WINNERS, KEY_DRAW_COUNTER, KEY_SETTINGS];

pub trait StateStorage {
    /// Fetch a document; `Ok(None)` when it was never written.
    fn load(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write every entry of the batch. A failure must never leave a
    /// half-written document behind, but backends without transactions may
    /// commit only a prefix of the batch.
    fn store_batch(&mut self, entries: &[(&'static str, String)]) -> StorageResult;
}

/// In-memory backend. Used for headless sessions and tests; can be told to
/// fail writes to exercise the degraded path.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    docs: BTreeMap<String, String>,
    fail_writes: Option<StorageError>,
    writes: u32,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent batch fail with `err`.
    pub fn fail_writes_with(&mut self, err: StorageError) {
        self.fail_writes = Some(err);
    }

    pub fn heal(&mut self) {
        self.fail_writes = None;
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.docs.get(key).map(String::as_str)
    }

    /// Place a raw document, bypassing encoding.
    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.docs.insert(String::from(key), String::from(value));
    }

    /// Number of successful batches.
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.docs.get(key).cloned())
    }

    fn store_batch(&mut self, entries: &[(&'static str, String)]) -> StorageResult {
        if let Some(err) = self.fail_writes {
            return Err(err);
        }
        for (key, value) in entries {
            self.docs.insert(String::from(*key), value.clone());
        }
        self.writes += 1;
        Ok(())
    }
}

impl<T: StateStorage + ?Sized> StateStorage for &mut T {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).load(key)
    }

    fn store_batch(&mut self, entries: &[(&'static str, String)]) -> StorageResult {
        (**self).store_batch(entries)
    }
}
