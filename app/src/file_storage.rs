//! Persisted documents as one JSON file per key under a data directory.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use raffle_core::{StateStorage, StorageError, StorageResult};
use raffle_lib::klog_warn;

const FILE_EXT: &str = "json";
const TEMP_EXT: &str = "json.tmp";

pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str, ext: &str) -> PathBuf {
        self.dir.join(key).with_extension(ext)
    }
}

fn map_io(err: &io::Error) -> StorageError {
    match err.kind() {
        ErrorKind::StorageFull => StorageError::QuotaExceeded,
        ErrorKind::PermissionDenied | ErrorKind::ReadOnlyFilesystem => StorageError::Unavailable,
        _ => StorageError::Io,
    }
}

impl StateStorage for FileStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.path(key, FILE_EXT)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => {
                klog_warn!("storage: read {} failed: {}", key, err);
                Err(map_io(&err))
            }
        }
    }

    /// Every entry is staged to a temporary file first and the renames only
    /// start once all of them were written, so a staging failure changes
    /// nothing. A failed rename leaves the keys before it committed.
    fn store_batch(&mut self, entries: &[(&'static str, String)]) -> StorageResult {
        fs::create_dir_all(&self.dir).map_err(|err| {
            klog_warn!("storage: cannot create {}: {}", self.dir.display(), err);
            map_io(&err)
        })?;

        for (key, value) in entries {
            if let Err(err) = fs::write(self.path(key, TEMP_EXT), value) {
                klog_warn!("storage: staging {} failed: {}", key, err);
                for (staged, _) in entries {
                    let _ = fs::remove_file(self.path(staged, TEMP_EXT));
                }
                return Err(map_io(&err));
            }
        }
        for (key, _) in entries {
            fs::rename(self.path(key, TEMP_EXT), self.path(key, FILE_EXT)).map_err(|err| {
                klog_warn!("storage: commit {} failed: {}", key, err);
                map_io(&err)
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raffle_core::storage::{KEY_DRAW_COUNTER, KEY_PARTICIPANTS};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn scratch_dir(tag: &str) -> PathBuf {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        let n = NEXT.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "raffle-storage-{}-{}-{}",
            tag,
            std::process::id(),
            n
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn missing_key_loads_as_none() {
        let storage = FileStorage::new(scratch_dir("missing"));
        assert_eq!(storage.load(KEY_PARTICIPANTS), Ok(None));
    }

    #[test]
    fn batch_round_trips_and_leaves_no_temp_files() {
        let dir = scratch_dir("batch");
        let mut storage = FileStorage::new(&dir);
        storage
            .store_batch(&[
                (KEY_PARTICIPANTS, String::from("[]")),
                (KEY_DRAW_COUNTER, String::from("3")),
            ])
            .unwrap();

        assert_eq!(storage.load(KEY_DRAW_COUNTER).unwrap().as_deref(), Some("3"));
        assert_eq!(storage.load(KEY_PARTICIPANTS).unwrap().as_deref(), Some("[]"));
        let leftovers = fs::read_dir(&dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn staging_failure_keeps_previous_documents() {
        let dir = scratch_dir("staging");
        let mut storage = FileStorage::new(&dir);
        storage
            .store_batch(&[
                (KEY_PARTICIPANTS, String::from("[]")),
                (KEY_DRAW_COUNTER, String::from("1")),
            ])
            .unwrap();
        fs::create_dir(storage.path(KEY_DRAW_COUNTER, TEMP_EXT)).unwrap();

        let result = storage.store_batch(&[
            (KEY_PARTICIPANTS, String::from("[{}]")),
            (KEY_DRAW_COUNTER, String::from("2")),
        ]);
        assert!(result.is_err());
        assert_eq!(storage.load(KEY_PARTICIPANTS).unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.load(KEY_DRAW_COUNTER).unwrap().as_deref(), Some("1"));
        assert!(!storage.path(KEY_PARTICIPANTS, TEMP_EXT).exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn overwrite_replaces_previous_value() {
        let dir = scratch_dir("overwrite");
        let mut storage = FileStorage::new(&dir);
        storage.store_batch(&[(KEY_DRAW_COUNTER, String::from("1"))]).unwrap();
        storage.store_batch(&[(KEY_DRAW_COUNTER, String::from("2"))]).unwrap();
        assert_eq!(storage.load(KEY_DRAW_COUNTER).unwrap().as_deref(), Some("2"));
        fs::remove_dir_all(&dir).unwrap();
    }
}
