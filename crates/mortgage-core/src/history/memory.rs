use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::history::entry::{HistoryCollection, HistoryEntry, NewHistoryEntry};
use crate::history::store::{HistoryOptions, HistoryStore};
use crate::MortgageResult;

/// Process-local store with the same retention semantics as the file store.
#[derive(Debug)]
pub struct MemoryHistoryStore {
    collection: Mutex<HistoryCollection>,
    options: HistoryOptions,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self {
            collection: Mutex::new(HistoryCollection::default()),
            options: HistoryOptions::default(),
        }
    }

    pub fn with_options(options: HistoryOptions) -> MortgageResult<Self> {
        options.validate()?;
        Ok(Self {
            collection: Mutex::new(HistoryCollection::default()),
            options,
        })
    }
}

impl Default for MemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn list(&self) -> MortgageResult<Vec<HistoryEntry>> {
        let collection = self.collection.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(collection.newest_first())
    }

    fn add(&self, entry: NewHistoryEntry) -> MortgageResult<HistoryEntry> {
        let mut collection = self.collection.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = entry.materialize(self.options.clock.now());
        let evicted = collection.push_capped(entry.clone(), self.options.capacity);
        if evicted > 0 {
            debug!(evicted, "evicted oldest history entries");
        }
        Ok(entry)
    }

    fn remove(&self, id: &str) -> MortgageResult<bool> {
        let mut collection = self.collection.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(collection.remove(id))
    }

    fn get(&self, id: &str) -> MortgageResult<Option<HistoryEntry>> {
        let collection = self.collection.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(collection.get(id).cloned())
    }
}
