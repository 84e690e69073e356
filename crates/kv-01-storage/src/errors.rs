//! # Storage Errors

use thiserror::Error;

/// Key-value store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// Persisted data could not be parsed.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },

    /// The store file is held by another process.
    #[error("KV store locked: {message}")]
    Locked { message: String },
}

impl KVStoreError {
    pub(crate) fn io(err: std::io::Error) -> Self {
        Self::IOError {
            message: err.to_string(),
        }
    }
}
