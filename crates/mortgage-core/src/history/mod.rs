//! Saved-calculation history.
//!
//! Entries are append-only and capped at a retention limit; the oldest
//! insertions are evicted first. Stores are plain values owned by the
//! caller; every mutation is serialized behind the store's own lock.

pub mod entry;
pub mod json_file;
pub mod memory;
pub mod store;

pub use entry::{HistoryCollection, HistoryEntry, NewHistoryEntry};
pub use json_file::JsonFileHistoryStore;
pub use memory::MemoryHistoryStore;
pub use store::{Clock, HistoryOptions, HistoryStore, SystemClock, DEFAULT_RETENTION_CAP};
