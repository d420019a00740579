use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MortgageError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("History file '{}' is corrupted: {reason}", path.display())]
    HistoryCorrupted { path: PathBuf, reason: String },
}

impl MortgageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MortgageError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for MortgageError {
    fn from(e: serde_json::Error) -> Self {
        MortgageError::SerializationError(e.to_string())
    }
}
