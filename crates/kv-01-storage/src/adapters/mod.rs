//! Storage Adapters
//!
//! Implementations of the `KeyValueStore` trait.

mod file;
#[cfg(feature = "locking")]
mod lock;
mod memory;

pub use file::FileBackedKVStore;
#[cfg(feature = "locking")]
pub use lock::{DatabaseLock, LockError, STORE_LOCK_TIMEOUT};
pub use memory::InMemoryKVStore;
