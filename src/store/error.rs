//! State store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing the persisted state
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading, writing or renaming the state file failed
    #[error("State file I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The state file exists but does not hold a valid record
    #[error("State file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// Encoding the record to JSON failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),
}
