//! # KeyManager Port
//!
//! What the signing gateway needs from whoever holds a key.

use async_trait::async_trait;
use shared_types::{AttestationData, BeaconBlockHeader, BlsPublicKey, BlsSignature, Domain, Root};

use crate::error::KeyManagerResult;

/// Signing capability set.
///
/// None of these methods consult slashing history; callers that need
/// protection run the slashing engine first.
#[async_trait]
pub trait KeyManager: Send + Sync {
    /// Sign `root` with no domain and no slashing context.
    async fn sign(&self, public_key: &BlsPublicKey, root: &Root) -> KeyManagerResult<BlsSignature>;

    /// Sign `compute_signing_root(root, domain)`.
    async fn sign_generic(
        &self,
        public_key: &BlsPublicKey,
        root: &Root,
        domain: &Domain,
    ) -> KeyManagerResult<BlsSignature>;

    async fn sign_proposal(
        &self,
        public_key: &BlsPublicKey,
        domain: &Domain,
        header: &BeaconBlockHeader,
    ) -> KeyManagerResult<BlsSignature>;

    async fn sign_attestation(
        &self,
        public_key: &BlsPublicKey,
        domain: &Domain,
        data: &AttestationData,
    ) -> KeyManagerResult<BlsSignature>;

    /// Public keys this manager can sign for.
    async fn fetch_validating_keys(&self) -> KeyManagerResult<Vec<BlsPublicKey>>;
}
