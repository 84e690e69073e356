//! Inbound port (Driving Port)
//!
//! Calls are synchronous: the critical section is a store read plus one
//! durable write, and callers on an async runtime already own the request.

use crate::domain::{Verdict, VoteRecord};
use crate::error::SlashingResult;
use shared_types::{AttestationData, BeaconBlockHeader, BlsPublicKey, Domain};

/// Slashing protection API
pub trait SlashingProtectionApi: Send + Sync {
    /// Validate an attestation for `public_key` and, if safe, durably record
    /// it. `Accept` is only returned after the write succeeded.
    fn validate_and_record_attestation(
        &self,
        public_key: &BlsPublicKey,
        domain: &Domain,
        data: &AttestationData,
    ) -> SlashingResult<Verdict>;

    /// Validate a block proposal for `public_key` and, if safe, durably
    /// record its slot.
    fn validate_and_record_proposal(
        &self,
        public_key: &BlsPublicKey,
        domain: &Domain,
        header: &BeaconBlockHeader,
    ) -> SlashingResult<Verdict>;

    /// Stored history for one key.
    fn vote_record(&self, public_key: &BlsPublicKey) -> SlashingResult<Option<VoteRecord>>;

    /// Every stored history, sorted by public key.
    fn export(&self) -> SlashingResult<Vec<(BlsPublicKey, VoteRecord)>>;

    /// Merge external history. Returns the number of keys written.
    fn import(&self, records: Vec<(BlsPublicKey, VoteRecord)>) -> SlashingResult<usize>;
}
