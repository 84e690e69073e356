//! In-process BLS signer.

use std::collections::HashMap;

use async_trait::async_trait;
use shared_types::{
    compute_signing_root, hash_tree_root, AttestationData, BeaconBlockHeader, BlsPublicKey,
    BlsSignature, Domain, Root,
};

use crate::domain::BlsKeyPair;
use crate::error::{KeyManagerError, KeyManagerResult};
use crate::ports::KeyManager;

/// Signs with keys held in memory.
#[derive(Debug, Default)]
pub struct LocalKeyManager {
    keys: HashMap<BlsPublicKey, BlsKeyPair>,
}

impl LocalKeyManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager holding a single key.
    pub fn with_key(pair: BlsKeyPair) -> Self {
        let mut manager = Self::new();
        manager.insert(pair);
        manager
    }

    pub fn insert(&mut self, pair: BlsKeyPair) {
        self.keys.insert(pair.public_key(), pair);
    }

    fn pair(&self, public_key: &BlsPublicKey) -> KeyManagerResult<&BlsKeyPair> {
        self.keys
            .get(public_key)
            .ok_or(KeyManagerError::NoSuchKey(*public_key))
    }

    fn sign_root(
        &self,
        public_key: &BlsPublicKey,
        object_root: &Root,
        domain: &Domain,
    ) -> KeyManagerResult<BlsSignature> {
        let signing_root = compute_signing_root(object_root, domain);
        Ok(self.pair(public_key)?.sign(signing_root.as_bytes()))
    }
}

#[async_trait]
impl KeyManager for LocalKeyManager {
    async fn sign(&self, public_key: &BlsPublicKey, root: &Root) -> KeyManagerResult<BlsSignature> {
        Ok(self.pair(public_key)?.sign(root.as_bytes()))
    }

    async fn sign_generic(
        &self,
        public_key: &BlsPublicKey,
        root: &Root,
        domain: &Domain,
    ) -> KeyManagerResult<BlsSignature> {
        self.sign_root(public_key, root, domain)
    }

    async fn sign_proposal(
        &self,
        public_key: &BlsPublicKey,
        domain: &Domain,
        header: &BeaconBlockHeader,
    ) -> KeyManagerResult<BlsSignature> {
        self.sign_root(public_key, &hash_tree_root(header), domain)
    }

    async fn sign_attestation(
        &self,
        public_key: &BlsPublicKey,
        domain: &Domain,
        data: &AttestationData,
    ) -> KeyManagerResult<BlsSignature> {
        self.sign_root(public_key, &hash_tree_root(data), domain)
    }

    async fn fetch_validating_keys(&self) -> KeyManagerResult<Vec<BlsPublicKey>> {
        let mut keys: Vec<_> = self.keys.keys().copied().collect();
        keys.sort();
        Ok(keys)
    }
}
