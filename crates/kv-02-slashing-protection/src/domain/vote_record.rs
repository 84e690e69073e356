//! # Vote Record
//!
//! The per-key watermark the slashing rules compare against.

use serde::{Deserialize, Serialize};
use shared_types::{Domain, Epoch, Slot};

/// Last accepted attestation for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationVote {
    pub source_epoch: Epoch,
    pub target_epoch: Epoch,
    /// Domain the vote was signed under. Kept for audit, never validated.
    pub domain: Domain,
}

/// Slashing history of one public key.
///
/// `None` in either slot means no vote of that type was ever accepted, so
/// the next one becomes the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub last_attestation: Option<AttestationVote>,
    pub last_proposal_slot: Option<Slot>,
}

impl VoteRecord {
    /// Combine two histories so that the result is at least as strict as
    /// either input.
    ///
    /// Watermarks are merged independently: source and target epochs each
    /// take the maximum, as does the proposal slot. Because every input has
    /// `source <= target`, so does the merge.
    pub fn merge(&self, other: &VoteRecord) -> VoteRecord {
        let last_attestation = match (self.last_attestation, other.last_attestation) {
            (Some(a), Some(b)) => {
                let domain = if b.target_epoch > a.target_epoch {
                    b.domain
                } else {
                    a.domain
                };
                Some(AttestationVote {
                    source_epoch: a.source_epoch.max(b.source_epoch),
                    target_epoch: a.target_epoch.max(b.target_epoch),
                    domain,
                })
            }
            (a, b) => a.or(b),
        };

        let last_proposal_slot = match (self.last_proposal_slot, other.last_proposal_slot) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };

        VoteRecord {
            last_attestation,
            last_proposal_slot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(source_epoch: Epoch, target_epoch: Epoch, tag: u8) -> AttestationVote {
        AttestationVote {
            source_epoch,
            target_epoch,
            domain: Domain([tag; 32]),
        }
    }

    #[test]
    fn test_merge_takes_each_watermark_maximum() {
        let local = VoteRecord {
            last_attestation: Some(vote(5, 6, 1)),
            last_proposal_slot: Some(40),
        };
        let imported = VoteRecord {
            last_attestation: Some(vote(3, 9, 2)),
            last_proposal_slot: Some(12),
        };

        let merged = local.merge(&imported);
        assert_eq!(merged.last_attestation, Some(vote(5, 9, 2)));
        assert_eq!(merged.last_proposal_slot, Some(40));
    }

    #[test]
    fn test_merge_with_empty_keeps_existing() {
        let local = VoteRecord {
            last_attestation: Some(vote(1, 2, 1)),
            last_proposal_slot: None,
        };
        let imported = VoteRecord {
            last_attestation: None,
            last_proposal_slot: Some(7),
        };

        let merged = local.merge(&imported);
        assert_eq!(merged.last_attestation, Some(vote(1, 2, 1)));
        assert_eq!(merged.last_proposal_slot, Some(7));
        assert_eq!(VoteRecord::default().merge(&local), local);
    }

    #[test]
    fn test_record_json_shape() {
        let record = VoteRecord {
            last_attestation: Some(vote(1, 2, 0)),
            last_proposal_slot: Some(3),
        };
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(json["lastAttestation"]["targetEpoch"], 2);
        assert_eq!(json["lastProposalSlot"], 3);
        assert_eq!(json["lastAttestation"]["domain"], "00".repeat(32));
    }
}
