//! Runtime configuration.
//!
//! Values come from the environment (optionally via a `.env` file) and can
//! be overridden per invocation by global CLI flags.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use mortgage_core::history::{HistoryOptions, JsonFileHistoryStore, DEFAULT_RETENTION_CAP};
use tracing::debug;

/// File name the web app has always used for saved calculations.
pub const DEFAULT_HISTORY_FILE: &str = "dbHistory.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON document holding saved calculations
    pub history_file: PathBuf,

    /// Maximum number of retained history entries
    pub history_cap: usize,
}

impl Config {
    /// Load from the environment.
    ///
    /// # Optional Environment Variables
    ///
    /// - `MORTGAGE_HISTORY_FILE`: history document path (default: `dbHistory.json`)
    /// - `MORTGAGE_HISTORY_CAP`: retention cap (default: 50)
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            history_file: env::var("MORTGAGE_HISTORY_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_HISTORY_FILE)),
            history_cap: parse_cap(env::var("MORTGAGE_HISTORY_CAP").ok())?,
        })
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(mut self, history_file: Option<PathBuf>, history_cap: Option<usize>) -> Self {
        if let Some(path) = history_file {
            self.history_file = path;
        }
        if let Some(cap) = history_cap {
            self.history_cap = cap;
        }
        self
    }

    pub fn open_history(&self) -> Result<JsonFileHistoryStore> {
        let options = HistoryOptions::default().with_capacity(self.history_cap);
        let store = JsonFileHistoryStore::open_with_options(&self.history_file, options)
            .with_context(|| {
                format!(
                    "Failed to open history file '{}'",
                    self.history_file.display()
                )
            })?;
        debug!(path = %store.path().display(), capacity = store.capacity(), "opened history");
        Ok(store)
    }
}

fn parse_cap(raw: Option<String>) -> Result<usize> {
    match raw {
        None => Ok(DEFAULT_RETENTION_CAP),
        Some(s) => s
            .trim()
            .parse()
            .with_context(|| format!("MORTGAGE_HISTORY_CAP must be a positive integer, got '{s}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_default_and_parse() {
        assert_eq!(parse_cap(None).unwrap(), 50);
        assert_eq!(parse_cap(Some(" 10 ".into())).unwrap(), 10);
        assert!(parse_cap(Some("ten".into())).is_err());
    }

    #[test]
    fn test_overrides_win() {
        let base = Config {
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            history_cap: 50,
        };
        let cfg = base
            .clone()
            .with_overrides(Some(PathBuf::from("/tmp/h.json")), None);
        assert_eq!(cfg.history_file, PathBuf::from("/tmp/h.json"));
        assert_eq!(cfg.history_cap, 50);
        assert_eq!(base.clone().with_overrides(None, None), base);
    }

    #[test]
    fn test_zero_cap_fails_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config {
            history_file: dir.path().join("history.json"),
            history_cap: 0,
        };
        assert!(cfg.open_history().is_err());
        assert!(!cfg.history_file.exists());
    }

    #[test]
    fn test_open_history_applies_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config {
            history_file: dir.path().join("history.json"),
            history_cap: 7,
        };
        let store = cfg.open_history().unwrap();
        assert_eq!(store.path(), cfg.history_file.as_path());
        assert_eq!(store.capacity(), 7);
    }
}
