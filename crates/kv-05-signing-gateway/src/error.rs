//! Gateway error types
//!
//! Every failure a caller can see, with a stable `ErrorKind` that decides
//! the HTTP status.

use kv_02_slashing_protection::{SlashingError, SlashingViolation};
use kv_03_key_manager::KeyManagerError;
use kv_04_wallet_store::WalletError;
use shared_types::BlsPublicKey;
use thiserror::Error;

/// Coarse classification of gateway failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    NoSuchKey,
    SlashableAttestation,
    SlashableProposal,
    UnprotectedSigningUnsupported,
    Transport,
    Encoding,
    Storage,
}

impl ErrorKind {
    /// HTTP status code for this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Validation | ErrorKind::Encoding => 400,
            ErrorKind::NotFound | ErrorKind::NoSuchKey => 404,
            ErrorKind::UnprotectedSigningUnsupported => 405,
            ErrorKind::SlashableAttestation | ErrorKind::SlashableProposal => 409,
            ErrorKind::Storage => 500,
            ErrorKind::Transport => 502,
        }
    }
}

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("no such key: {0}")]
    NoSuchKey(BlsPublicKey),

    #[error("slashable attestation: {0}")]
    SlashableAttestation(SlashingViolation),

    #[error("slashable proposal: {0}")]
    SlashableProposal(SlashingViolation),

    #[error(transparent)]
    Slashing(#[from] SlashingError),

    #[error(transparent)]
    KeyManager(#[from] KeyManagerError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Validation(_) => ErrorKind::Validation,
            GatewayError::NotFound(_) => ErrorKind::NotFound,
            GatewayError::NoSuchKey(_) => ErrorKind::NoSuchKey,
            GatewayError::SlashableAttestation(_) => ErrorKind::SlashableAttestation,
            GatewayError::SlashableProposal(_) => ErrorKind::SlashableProposal,
            GatewayError::Slashing(_) | GatewayError::Internal(_) => ErrorKind::Storage,
            GatewayError::KeyManager(e) => key_manager_kind(e),
            GatewayError::Wallet(e) => match e {
                WalletError::WalletNotFound { .. } => ErrorKind::NotFound,
                WalletError::WalletExists(_)
                | WalletError::AccountExists(_)
                | WalletError::InvalidName { .. }
                | WalletError::DuplicatePublicKey(_) => ErrorKind::Validation,
                WalletError::Encoding { .. } | WalletError::Storage(_) => ErrorKind::Storage,
                WalletError::Key(e) => key_manager_kind(e),
            },
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }
}

fn key_manager_kind(error: &KeyManagerError) -> ErrorKind {
    match error {
        KeyManagerError::Validation(_) => ErrorKind::Validation,
        KeyManagerError::NoSuchKey(_) => ErrorKind::NoSuchKey,
        KeyManagerError::UnprotectedSigningUnsupported => ErrorKind::UnprotectedSigningUnsupported,
        KeyManagerError::Transport { .. } | KeyManagerError::Network { .. } => ErrorKind::Transport,
        KeyManagerError::Encoding { .. } | KeyManagerError::Hex(_) => ErrorKind::Encoding,
        KeyManagerError::Bls(_) => ErrorKind::Storage,
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
