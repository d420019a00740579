use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::MortgageError;
use crate::history::entry::{HistoryEntry, NewHistoryEntry};
use crate::MortgageResult;

/// Maximum number of retained history entries unless configured otherwise.
pub const DEFAULT_RETENTION_CAP: usize = 50;

/// Source of `created_at` timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Construction options shared by every store implementation.
#[derive(Clone)]
pub struct HistoryOptions {
    pub capacity: usize,
    pub clock: Arc<dyn Clock>,
}

impl HistoryOptions {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub(crate) fn validate(&self) -> MortgageResult<()> {
        if self.capacity == 0 {
            return Err(MortgageError::InvalidInput {
                field: "capacity".into(),
                reason: "History retention cap must be at least 1".into(),
            });
        }
        Ok(())
    }
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_RETENTION_CAP,
            clock: Arc::new(SystemClock),
        }
    }
}

impl fmt::Debug for HistoryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryOptions")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

/// Persistence of saved calculations.
///
/// Implementations serialize each read-modify-write internally, so a shared
/// reference can be handed to concurrent callers.
pub trait HistoryStore: Send + Sync {
    /// All retained entries, newest first.
    fn list(&self) -> MortgageResult<Vec<HistoryEntry>>;

    /// Append a new entry, evicting the oldest beyond the retention cap.
    fn add(&self, entry: NewHistoryEntry) -> MortgageResult<HistoryEntry>;

    /// Remove by id. Unknown ids return `Ok(false)`.
    fn remove(&self, id: &str) -> MortgageResult<bool>;

    fn get(&self, id: &str) -> MortgageResult<Option<HistoryEntry>> {
        Ok(self.list()?.into_iter().find(|e| e.id == id))
    }
}
