//! # Signing Gateway Service
//!
//! Ordering per request:
//!
//! 1. resolve the key manager (unknown key ⇒ `NoSuchKey`, engine untouched)
//! 2. validate and durably record the vote (reject ⇒ `Slashable*`)
//! 3. sign
//!
//! Step 2 runs on the blocking pool since it ends in an fsync.

use std::sync::Arc;

use kv_02_slashing_protection::{SlashingProtectionApi, SlashingResult, Verdict, VoteRecord};
use kv_03_key_manager::KeyManager;
use shared_types::{AttestationData, BeaconBlockHeader, BlsPublicKey, BlsSignature, Domain, Root};
use tracing::{debug, info};

use crate::error::{GatewayError, GatewayResult};
use crate::ports::KeyManagerResolver;

/// Slashing-protected signing over a resolver and an engine.
pub struct SigningGateway {
    resolver: Arc<dyn KeyManagerResolver>,
    slashing: Arc<dyn SlashingProtectionApi>,
}

impl SigningGateway {
    pub fn new(
        resolver: Arc<dyn KeyManagerResolver>,
        slashing: Arc<dyn SlashingProtectionApi>,
    ) -> Self {
        Self { resolver, slashing }
    }

    fn resolve(&self, public_key: &BlsPublicKey) -> GatewayResult<Arc<dyn KeyManager>> {
        self.resolver
            .resolve(public_key)?
            .ok_or(GatewayError::NoSuchKey(*public_key))
    }

    async fn with_engine<T, F>(&self, op: F) -> GatewayResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn SlashingProtectionApi) -> SlashingResult<T> + Send + 'static,
    {
        let engine = Arc::clone(&self.slashing);
        let result = tokio::task::spawn_blocking(move || op(engine.as_ref()))
            .await
            .map_err(|e| GatewayError::Internal(format!("slashing check aborted: {}", e)))?;
        Ok(result?)
    }

    pub async fn sign_proposal(
        &self,
        public_key: &BlsPublicKey,
        domain: &Domain,
        header: &BeaconBlockHeader,
    ) -> GatewayResult<BlsSignature> {
        let manager = self.resolve(public_key)?;

        let (pk, d, h) = (*public_key, *domain, *header);
        let verdict = self
            .with_engine(move |engine| engine.validate_and_record_proposal(&pk, &d, &h))
            .await?;
        if let Verdict::Reject(violation) = verdict {
            return Err(GatewayError::SlashableProposal(violation));
        }

        let signature = manager.sign_proposal(public_key, domain, header).await?;
        info!(public_key = %public_key, slot = header.slot, "[kv-05] ✍️ Signed proposal");
        Ok(signature)
    }

    pub async fn sign_attestation(
        &self,
        public_key: &BlsPublicKey,
        domain: &Domain,
        data: &AttestationData,
    ) -> GatewayResult<BlsSignature> {
        let manager = self.resolve(public_key)?;

        let (pk, d, a) = (*public_key, *domain, *data);
        let verdict = self
            .with_engine(move |engine| engine.validate_and_record_attestation(&pk, &d, &a))
            .await?;
        if let Verdict::Reject(violation) = verdict {
            return Err(GatewayError::SlashableAttestation(violation));
        }

        let signature = manager.sign_attestation(public_key, domain, data).await?;
        info!(
            public_key = %public_key,
            source_epoch = data.source.epoch,
            target_epoch = data.target.epoch,
            "[kv-05] ✍️ Signed attestation"
        );
        Ok(signature)
    }

    /// Aggregation signatures are not slashable; no engine call.
    pub async fn sign_aggregation(
        &self,
        public_key: &BlsPublicKey,
        domain: &Domain,
        root: &Root,
    ) -> GatewayResult<BlsSignature> {
        let manager = self.resolve(public_key)?;
        let signature = manager.sign_generic(public_key, root, domain).await?;
        debug!(public_key = %public_key, "[kv-05] Signed aggregation");
        Ok(signature)
    }

    pub async fn export_slashing(&self) -> GatewayResult<Vec<(BlsPublicKey, VoteRecord)>> {
        self.with_engine(|engine| engine.export()).await
    }

    pub async fn import_slashing(
        &self,
        records: Vec<(BlsPublicKey, VoteRecord)>,
    ) -> GatewayResult<usize> {
        self.with_engine(move |engine| engine.import(records)).await
    }
}
