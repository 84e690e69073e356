//! # kv-01-storage
//!
//! Pluggable key-storage medium for the key vault.
//!
//! ## Overview
//!
//! Every persistent subsystem (wallet store, slashing protection) talks to a
//! [`KeyValueStore`] port. Two adapters ship with the crate:
//!
//! | Adapter | Durability | Use |
//! |---------|-----------|-----|
//! | [`InMemoryKVStore`] | none | tests, ephemeral vaults |
//! | [`FileBackedKVStore`] | fsync + atomic rename per write | production |
//!
//! The file-backed adapter holds an exclusive process lock on its file for
//! its whole lifetime, so two vault processes can never share one store.

pub mod adapters;
pub mod errors;
pub mod ports;

pub use adapters::{FileBackedKVStore, InMemoryKVStore};
#[cfg(feature = "locking")]
pub use adapters::{DatabaseLock, LockError};
pub use errors::KVStoreError;
pub use ports::{BatchOperation, KeyValueStore, ScanResult};
