//! Error types for the slashing protection engine
//!
//! A slashing violation is not an error here: it is a `Verdict::Reject`.
//! Errors are reserved for the engine being unable to decide.

use kv_01_storage::KVStoreError;
use shared_types::BlsPublicKey;
use thiserror::Error;

/// Slashing protection errors
#[derive(Debug, Error)]
pub enum SlashingError {
    /// The backing store failed; the vote was not recorded
    #[error("slashing protection storage failure: {0}")]
    Storage(#[from] KVStoreError),

    /// A stored record could not be encoded or decoded
    #[error("slashing record for {public_key} is unreadable: {reason}")]
    Encoding {
        public_key: BlsPublicKey,
        reason: String,
    },

    /// A storage key under the slashing prefix does not name a public key
    #[error("malformed slashing storage key: {key}")]
    MalformedKey { key: String },
}

/// Result type for slashing protection operations
pub type SlashingResult<T> = Result<T, SlashingError>;
