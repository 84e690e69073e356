//! `SlashingStore` over any `KeyValueStore`.
//!
//! Records are bincode-encoded under `slashing/<hex public key>`.

use std::sync::Arc;

use kv_01_storage::KeyValueStore;
use parking_lot::RwLock;
use shared_types::BlsPublicKey;
use tracing::debug;

use crate::domain::VoteRecord;
use crate::error::{SlashingError, SlashingResult};
use crate::ports::SlashingStore;

/// Key prefix for vote records.
pub const SLASHING_PREFIX: &str = "slashing/";

/// Vote-record persistence over a shared key-value store.
pub struct KvSlashingStore<K: KeyValueStore> {
    kv: Arc<RwLock<K>>,
}

impl<K: KeyValueStore> KvSlashingStore<K> {
    pub fn new(kv: K) -> Self {
        Self::shared(Arc::new(RwLock::new(kv)))
    }

    /// Use a store that other components also hold.
    pub fn shared(kv: Arc<RwLock<K>>) -> Self {
        Self { kv }
    }

    fn storage_key(public_key: &BlsPublicKey) -> Vec<u8> {
        format!("{}{}", SLASHING_PREFIX, public_key.to_hex()).into_bytes()
    }

    fn decode(public_key: &BlsPublicKey, bytes: &[u8]) -> SlashingResult<VoteRecord> {
        bincode::deserialize(bytes).map_err(|e| SlashingError::Encoding {
            public_key: *public_key,
            reason: e.to_string(),
        })
    }
}

impl<K: KeyValueStore> SlashingStore for KvSlashingStore<K> {
    fn load(&self, public_key: &BlsPublicKey) -> SlashingResult<Option<VoteRecord>> {
        let bytes = self.kv.read().get(&Self::storage_key(public_key))?;
        bytes.map(|b| Self::decode(public_key, &b)).transpose()
    }

    fn save(&self, public_key: &BlsPublicKey, record: &VoteRecord) -> SlashingResult<()> {
        let bytes = bincode::serialize(record).map_err(|e| SlashingError::Encoding {
            public_key: *public_key,
            reason: e.to_string(),
        })?;
        self.kv.write().put(&Self::storage_key(public_key), &bytes)?;
        debug!("[kv-02] Persisted vote record for {}", public_key);
        Ok(())
    }

    fn load_all(&self) -> SlashingResult<Vec<(BlsPublicKey, VoteRecord)>> {
        let entries = self.kv.read().prefix_scan(SLASHING_PREFIX.as_bytes())?;

        entries
            .into_iter()
            .map(|(key, value)| {
                let malformed = || SlashingError::MalformedKey {
                    key: String::from_utf8_lossy(&key).into_owned(),
                };
                let hex = std::str::from_utf8(&key[SLASHING_PREFIX.len()..])
                    .map_err(|_| malformed())?;
                let public_key =
                    BlsPublicKey::from_hex("publicKey", hex).map_err(|_| malformed())?;
                Ok((public_key, Self::decode(&public_key, &value)?))
            })
            .collect()
    }
}
