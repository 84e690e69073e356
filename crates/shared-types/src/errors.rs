//! # Error Types
//!
//! Defines the wire-codec error shared across subsystems.

use thiserror::Error;

/// Errors raised while decoding a hex-encoded fixed-width field.
///
/// Every variant names the offending field so callers can surface it
/// verbatim (e.g. `parentRoot`, `pubKey`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    /// The value is not valid hex.
    #[error("failed to hex decode field '{field}': {reason}")]
    InvalidHex { field: String, reason: String },

    /// The value decoded but has the wrong byte length.
    #[error("field '{field}' must be {expected} bytes, got {actual}")]
    InvalidLength {
        field: String,
        expected: usize,
        actual: usize,
    },
}

impl HexError {
    /// Name of the field that failed to decode.
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidHex { field, .. } => field,
            Self::InvalidLength { field, .. } => field,
        }
    }
}
