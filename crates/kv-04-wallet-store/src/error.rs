//! Error types for the wallet store

use kv_01_storage::KVStoreError;
use kv_03_key_manager::KeyManagerError;
use shared_types::BlsPublicKey;
use thiserror::Error;

/// Wallet store errors
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet \"{0}\" already exists")]
    WalletExists(String),

    #[error("failed to retrieve wallet by name: no wallet found")]
    WalletNotFound { name: String },

    #[error("account \"{0}\" already exists")]
    AccountExists(String),

    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("public key {0} is already bound to an account")]
    DuplicatePublicKey(BlsPublicKey),

    #[error("stored record {key} is unreadable: {reason}")]
    Encoding { key: String, reason: String },

    #[error("storage failure: {0}")]
    Storage(#[from] KVStoreError),

    #[error("key material: {0}")]
    Key(#[from] KeyManagerError),
}

/// Result type for wallet store operations
pub type WalletResult<T> = Result<T, WalletError>;
