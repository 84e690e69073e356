//! Error types for key managers

use shared_types::{BlsPublicKey, HexError};
use thiserror::Error;

/// Key manager errors
#[derive(Debug, Error)]
pub enum KeyManagerError {
    /// Bad construction options or request input
    #[error("{0}")]
    Validation(String),

    /// This manager holds no key with that public key
    #[error("no such key: {0}")]
    NoSuchKey(BlsPublicKey),

    /// Signing a raw root without slashing context
    #[error("unprotected signing is not supported")]
    UnprotectedSigningUnsupported,

    /// Remote signer answered with a non-200 status
    #[error("remote signer {endpoint} returned {status}: {body}")]
    Transport {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Remote signer unreachable, or the call timed out
    #[error("{context}: {source}")]
    Network {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// A payload could not be decoded
    #[error("{context}: {reason}")]
    Encoding { context: String, reason: String },

    /// A hex field was malformed
    #[error(transparent)]
    Hex(#[from] HexError),

    /// Key material rejected by the BLS library
    #[error("bls: {0}")]
    Bls(String),
}

/// Result type for key manager operations
pub type KeyManagerResult<T> = Result<T, KeyManagerError>;
