//! # Slashing Protection Service
//!
//! Serializes validate-and-record per public key. Only the lock of the
//! request's key is held, and only over load → check → save; distinct keys
//! never contend.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use shared_types::{AttestationData, BeaconBlockHeader, BlsPublicKey, Domain};
use tracing::{debug, info, warn};

use crate::domain::{rules, AttestationVote, Verdict, VoteRecord};
use crate::error::SlashingResult;
use crate::ports::{SlashingProtectionApi, SlashingStore};

/// Slashing protection engine over a `SlashingStore`.
pub struct SlashingProtection<S: SlashingStore> {
    store: S,
    key_locks: DashMap<BlsPublicKey, Arc<Mutex<()>>>,
}

impl<S: SlashingStore> SlashingProtection<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            key_locks: DashMap::new(),
        }
    }

    /// The mutex guarding `public_key`. The map shard lock is released
    /// before the caller blocks on the returned mutex.
    fn key_lock(&self, public_key: &BlsPublicKey) -> Arc<Mutex<()>> {
        self.key_locks.entry(*public_key).or_default().clone()
    }
}

impl<S: SlashingStore> SlashingProtectionApi for SlashingProtection<S> {
    fn validate_and_record_attestation(
        &self,
        public_key: &BlsPublicKey,
        domain: &Domain,
        data: &AttestationData,
    ) -> SlashingResult<Verdict> {
        let lock = self.key_lock(public_key);
        let _guard = lock.lock();

        let mut record = self.store.load(public_key)?.unwrap_or_default();
        let (source_epoch, target_epoch) = (data.source.epoch, data.target.epoch);

        if let Err(violation) =
            rules::check_attestation(record.last_attestation.as_ref(), source_epoch, target_epoch)
        {
            warn!(
                public_key = %public_key,
                source_epoch,
                target_epoch,
                "[kv-02] ⛔ Refused attestation: {}",
                violation
            );
            return Ok(Verdict::Reject(violation));
        }

        record.last_attestation = Some(AttestationVote {
            source_epoch,
            target_epoch,
            domain: *domain,
        });
        self.store.save(public_key, &record)?;

        debug!(
            public_key = %public_key,
            source_epoch,
            target_epoch,
            "[kv-02] Recorded attestation"
        );
        Ok(Verdict::Accept)
    }

    fn validate_and_record_proposal(
        &self,
        public_key: &BlsPublicKey,
        _domain: &Domain,
        header: &BeaconBlockHeader,
    ) -> SlashingResult<Verdict> {
        let lock = self.key_lock(public_key);
        let _guard = lock.lock();

        let mut record = self.store.load(public_key)?.unwrap_or_default();

        if let Err(violation) = rules::check_proposal(record.last_proposal_slot, header.slot) {
            warn!(
                public_key = %public_key,
                slot = header.slot,
                "[kv-02] ⛔ Refused proposal: {}",
                violation
            );
            return Ok(Verdict::Reject(violation));
        }

        record.last_proposal_slot = Some(header.slot);
        self.store.save(public_key, &record)?;

        debug!(public_key = %public_key, slot = header.slot, "[kv-02] Recorded proposal");
        Ok(Verdict::Accept)
    }

    fn vote_record(&self, public_key: &BlsPublicKey) -> SlashingResult<Option<VoteRecord>> {
        self.store.load(public_key)
    }

    fn export(&self) -> SlashingResult<Vec<(BlsPublicKey, VoteRecord)>> {
        self.store.load_all()
    }

    fn import(&self, records: Vec<(BlsPublicKey, VoteRecord)>) -> SlashingResult<usize> {
        let mut written = 0;
        for (public_key, incoming) in records {
            let lock = self.key_lock(&public_key);
            let _guard = lock.lock();

            let current = self.store.load(&public_key)?.unwrap_or_default();
            let merged = current.merge(&incoming);
            if merged != current {
                self.store.save(&public_key, &merged)?;
                written += 1;
            }
        }

        info!("[kv-02] 📥 Imported slashing history, {} keys updated", written);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::KvSlashingStore;
    use crate::domain::SlashingViolation;
    use crate::error::SlashingError;
    use kv_01_storage::{FileBackedKVStore, InMemoryKVStore, KVStoreError};
    use proptest::prelude::*;
    use shared_types::{Checkpoint, Root};
    use std::sync::Barrier;

    fn engine() -> SlashingProtection<KvSlashingStore<InMemoryKVStore>> {
        SlashingProtection::new(KvSlashingStore::new(InMemoryKVStore::new()))
    }

    fn key(tag: u8) -> BlsPublicKey {
        BlsPublicKey([tag; 48])
    }

    fn attestation(source: u64, target: u64) -> AttestationData {
        AttestationData {
            slot: target * 32,
            committee_index: 0,
            beacon_block_root: Root([0x11; 32]),
            source: Checkpoint {
                epoch: source,
                root: Root([0x22; 32]),
            },
            target: Checkpoint {
                epoch: target,
                root: Root([0x33; 32]),
            },
        }
    }

    fn proposal(slot: u64) -> BeaconBlockHeader {
        BeaconBlockHeader {
            slot,
            proposer_index: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_attestation_accepted_and_recorded() {
        let engine = engine();
        let domain = Domain([9u8; 32]);

        let verdict = engine
            .validate_and_record_attestation(&key(1), &domain, &attestation(2, 3))
            .unwrap();
        assert_eq!(verdict, Verdict::Accept);

        let record = engine.vote_record(&key(1)).unwrap().unwrap();
        let last = record.last_attestation.unwrap();
        assert_eq!((last.source_epoch, last.target_epoch), (2, 3));
        assert_eq!(last.domain, domain);
        assert_eq!(record.last_proposal_slot, None);
    }

    #[test]
    fn test_rejection_leaves_record_unchanged() {
        let engine = engine();
        let domain = Domain::default();
        engine
            .validate_and_record_attestation(&key(1), &domain, &attestation(2, 3))
            .unwrap();
        let before = engine.vote_record(&key(1)).unwrap();

        let double = engine
            .validate_and_record_attestation(&key(1), &domain, &attestation(2, 3))
            .unwrap();
        assert!(matches!(
            double,
            Verdict::Reject(SlashingViolation::DoubleVote { .. })
        ));

        let surrounding = engine
            .validate_and_record_attestation(&key(1), &domain, &attestation(1, 4))
            .unwrap();
        assert!(matches!(
            surrounding,
            Verdict::Reject(SlashingViolation::SurroundingVote { .. })
        ));

        assert_eq!(engine.vote_record(&key(1)).unwrap(), before);
    }

    #[test]
    fn test_keys_are_independent() {
        let engine = engine();
        let domain = Domain::default();

        engine
            .validate_and_record_attestation(&key(1), &domain, &attestation(5, 10))
            .unwrap();
        let other = engine
            .validate_and_record_attestation(&key(2), &domain, &attestation(0, 1))
            .unwrap();
        assert_eq!(other, Verdict::Accept);
    }

    #[test]
    fn test_proposal_slot_rule() {
        let engine = engine();
        let domain = Domain::default();

        let first = engine
            .validate_and_record_proposal(&key(1), &domain, &proposal(100))
            .unwrap();
        assert!(first.is_accept());

        let repeat = engine
            .validate_and_record_proposal(&key(1), &domain, &proposal(100))
            .unwrap();
        assert_eq!(
            repeat,
            Verdict::Reject(SlashingViolation::DoubleProposal {
                slot: 100,
                last_slot: 100
            })
        );

        let next = engine
            .validate_and_record_proposal(&key(1), &domain, &proposal(101))
            .unwrap();
        assert!(next.is_accept());
    }

    #[test]
    fn test_proposals_and_attestations_tracked_separately() {
        let engine = engine();
        let domain = Domain::default();

        engine
            .validate_and_record_proposal(&key(1), &domain, &proposal(500))
            .unwrap();
        let verdict = engine
            .validate_and_record_attestation(&key(1), &domain, &attestation(0, 1))
            .unwrap();
        assert!(verdict.is_accept());

        let record = engine.vote_record(&key(1)).unwrap().unwrap();
        assert_eq!(record.last_proposal_slot, Some(500));
        assert!(record.last_attestation.is_some());
    }

    #[test]
    fn test_concurrent_conflicting_attestations_one_wins() {
        for _ in 0..32 {
            let engine = engine();
            let barrier = Barrier::new(2);
            let domain = Domain::default();

            // Same target epoch: whichever lands second is a double vote.
            let votes = [attestation(2, 5), attestation(1, 5)];
            let verdicts: Vec<Verdict> = std::thread::scope(|s| {
                let handles: Vec<_> = votes
                    .iter()
                    .map(|vote| {
                        let engine = &engine;
                        let barrier = &barrier;
                        let domain = &domain;
                        s.spawn(move || {
                            barrier.wait();
                            engine
                                .validate_and_record_attestation(&key(1), domain, vote)
                                .unwrap()
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });

            let accepted = verdicts.iter().filter(|v| v.is_accept()).count();
            assert_eq!(accepted, 1, "verdicts: {:?}", verdicts);
        }
    }

    #[test]
    fn test_import_never_loosens() {
        let engine = engine();
        let domain = Domain::default();
        engine
            .validate_and_record_attestation(&key(1), &domain, &attestation(8, 9))
            .unwrap();
        engine
            .validate_and_record_proposal(&key(1), &domain, &proposal(300))
            .unwrap();

        let weaker = VoteRecord {
            last_attestation: Some(AttestationVote {
                source_epoch: 0,
                target_epoch: 1,
                domain,
            }),
            last_proposal_slot: Some(10),
        };
        let fresh = VoteRecord {
            last_attestation: None,
            last_proposal_slot: Some(77),
        };

        let written = engine
            .import(vec![(key(1), weaker), (key(2), fresh)])
            .unwrap();
        assert_eq!(written, 1);

        let record = engine.vote_record(&key(1)).unwrap().unwrap();
        assert_eq!(record.last_attestation.unwrap().target_epoch, 9);
        assert_eq!(record.last_proposal_slot, Some(300));

        let refused = engine
            .validate_and_record_proposal(&key(2), &domain, &proposal(77))
            .unwrap();
        assert!(!refused.is_accept());
    }

    #[test]
    fn test_export_lists_all_keys() {
        let engine = engine();
        let domain = Domain::default();
        engine
            .validate_and_record_proposal(&key(2), &domain, &proposal(1))
            .unwrap();
        engine
            .validate_and_record_proposal(&key(1), &domain, &proposal(1))
            .unwrap();

        let exported = engine.export().unwrap();
        let keys: Vec<_> = exported.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![key(1), key(2)]);
    }

    #[test]
    fn test_protection_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slashing.db");
        let domain = Domain::default();

        {
            let engine = SlashingProtection::new(KvSlashingStore::new(
                FileBackedKVStore::open(&path).unwrap(),
            ));
            engine
                .validate_and_record_attestation(&key(1), &domain, &attestation(3, 4))
                .unwrap();
        }

        let engine =
            SlashingProtection::new(KvSlashingStore::new(FileBackedKVStore::open(&path).unwrap()));
        let verdict = engine
            .validate_and_record_attestation(&key(1), &domain, &attestation(3, 4))
            .unwrap();
        assert!(matches!(
            verdict,
            Verdict::Reject(SlashingViolation::DoubleVote { .. })
        ));
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl SlashingStore for ReadOnlyStore {
        fn load(&self, _: &BlsPublicKey) -> SlashingResult<Option<VoteRecord>> {
            Ok(None)
        }

        fn save(&self, _: &BlsPublicKey, _: &VoteRecord) -> SlashingResult<()> {
            Err(KVStoreError::IOError {
                message: "disk full".into(),
            }
            .into())
        }

        fn load_all(&self) -> SlashingResult<Vec<(BlsPublicKey, VoteRecord)>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_failed_write_is_never_accept() {
        let engine = SlashingProtection::new(ReadOnlyStore);
        let result =
            engine.validate_and_record_attestation(&key(1), &Domain::default(), &attestation(0, 1));
        assert!(matches!(result, Err(SlashingError::Storage(_))));
    }

    proptest! {
        #[test]
        fn test_monotonic_votes_all_accepted(
            steps in prop::collection::vec((0u64..3, 1u64..5), 1..40)
        ) {
            let engine = engine();
            let domain = Domain::default();
            let (mut source, mut target) = (0u64, 0u64);

            for (source_step, target_step) in steps {
                target += target_step;
                source = (source + source_step).min(target);

                let verdict = engine
                    .validate_and_record_attestation(&key(1), &domain, &attestation(source, target))
                    .unwrap();
                prop_assert_eq!(verdict, Verdict::Accept);

                let last = engine.vote_record(&key(1)).unwrap().unwrap().last_attestation.unwrap();
                prop_assert_eq!((last.source_epoch, last.target_epoch), (source, target));
            }
        }

        #[test]
        fn test_non_increasing_target_always_refused(
            source in 0u64..50, target in 50u64..100, back in 0u64..50
        ) {
            let engine = engine();
            let domain = Domain::default();
            engine
                .validate_and_record_attestation(&key(1), &domain, &attestation(source, target))
                .unwrap();

            let new_target = target - back;
            let verdict = engine
                .validate_and_record_attestation(&key(1), &domain, &attestation(source, new_target))
                .unwrap();
            prop_assert!(!verdict.is_accept());
        }
    }
}
