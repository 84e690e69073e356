//! Slashing store adapters

mod kv_store;

pub use kv_store::{KvSlashingStore, SLASHING_PREFIX};
