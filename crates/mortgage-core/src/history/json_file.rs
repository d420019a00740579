use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::MortgageError;
use crate::history::entry::{HistoryCollection, HistoryEntry, NewHistoryEntry};
use crate::history::store::{HistoryOptions, HistoryStore};
use crate::MortgageResult;

/// History persisted as a single JSON document: `{ "entries": [...] }`.
///
/// Every operation re-reads the file, mutates in memory and writes the whole
/// document back; nothing is cached between calls. The write goes to a
/// uniquely named temp file in the same directory, is synced, and is then
/// renamed over the target.
///
/// The lock only serializes operations on this instance. Two instances (or
/// processes) on one path never see a torn document, but a read-modify-write
/// from one can still overwrite an add made concurrently by the other.
#[derive(Debug)]
pub struct JsonFileHistoryStore {
    path: PathBuf,
    options: HistoryOptions,
    write_lock: Mutex<()>,
}

impl JsonFileHistoryStore {
    /// Open (creating if missing) a store with the default retention cap.
    pub fn open(path: impl Into<PathBuf>) -> MortgageResult<Self> {
        Self::open_with_options(path, HistoryOptions::default())
    }

    pub fn open_with_options(
        path: impl Into<PathBuf>,
        options: HistoryOptions,
    ) -> MortgageResult<Self> {
        options.validate()?;
        let store = Self {
            path: path.into(),
            options,
            write_lock: Mutex::new(()),
        };

        match fs::metadata(&store.path) {
            Ok(_) => {
                // Fail at startup rather than on first use.
                store.read()?;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                store.write(&HistoryCollection::default())?;
                info!(path = %store.path.display(), "created empty history file");
            }
            Err(e) => return Err(MortgageError::io(&store.path, e)),
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capacity(&self) -> usize {
        self.options.capacity
    }

    fn read(&self) -> MortgageResult<HistoryCollection> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HistoryCollection::default()),
            Err(e) => return Err(MortgageError::io(&self.path, e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(HistoryCollection::default());
        }

        let collection: HistoryCollection =
            serde_json::from_slice(&bytes).map_err(|e| MortgageError::HistoryCorrupted {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        debug!(path = %self.path.display(), entries = collection.len(), "read history");
        Ok(collection)
    }

    fn write(&self, collection: &HistoryCollection) -> MortgageResult<()> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(|e| MortgageError::io(parent, e))?;
                parent
            }
            None => Path::new("."),
        };

        let json = serde_json::to_vec_pretty(collection)?;
        // Dropped (and removed) on any early return below.
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| MortgageError::io(dir, e))?;
        tmp.write_all(&json)
            .map_err(|e| MortgageError::io(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| MortgageError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| MortgageError::io(&self.path, e.error))?;
        debug!(path = %self.path.display(), entries = collection.len(), "wrote history");
        Ok(())
    }
}

impl HistoryStore for JsonFileHistoryStore {
    fn list(&self) -> MortgageResult<Vec<HistoryEntry>> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read()?.newest_first())
    }

    fn add(&self, entry: NewHistoryEntry) -> MortgageResult<HistoryEntry> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut collection = self.read()?;
        let entry = entry.materialize(self.options.clock.now());

        let evicted = collection.push_capped(entry.clone(), self.options.capacity);
        if evicted > 0 {
            debug!(evicted, capacity = self.options.capacity, "evicted oldest history entries");
        }

        self.write(&collection)?;
        info!(id = %entry.id, label = ?entry.label, "saved history entry");
        Ok(entry)
    }

    fn remove(&self, id: &str) -> MortgageResult<bool> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut collection = self.read()?;
        if !collection.remove(id) {
            debug!(id, "history entry not found");
            return Ok(false);
        }

        self.write(&collection)?;
        info!(id, "removed history entry");
        Ok(true)
    }

    fn get(&self, id: &str) -> MortgageResult<Option<HistoryEntry>> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read()?.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_empty_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dbHistory.json");
        let store = JsonFileHistoryStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());
        assert!(store.list().unwrap().is_empty());
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"entries\""));
    }

    #[test]
    fn test_writes_leave_no_temp_files_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dbHistory.json");
        let store = JsonFileHistoryStore::open(&path).unwrap();
        for label in ["a", "b", "c"] {
            let entry = NewHistoryEntry::new(serde_json::json!({}), serde_json::json!({}));
            store.add(entry.with_label(label)).unwrap();
        }
        let id = store.list().unwrap()[0].id.clone();
        assert!(store.remove(&id).unwrap());

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("dbHistory.json")]);
    }

    #[test]
    fn test_capacity_reflects_options() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("h.json");
        let store =
            JsonFileHistoryStore::open_with_options(&path, HistoryOptions::default().with_capacity(3))
                .unwrap();
        assert_eq!(store.capacity(), 3);
        assert_eq!(
            JsonFileHistoryStore::open(&path).unwrap().capacity(),
            crate::history::store::DEFAULT_RETENTION_CAP
        );
    }

    #[test]
    fn test_blank_file_reads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("h.json");
        fs::write(&path, "  \n").unwrap();
        let store = JsonFileHistoryStore::open(&path).unwrap();
        assert!(store.list().unwrap().is_empty());
    }
}
