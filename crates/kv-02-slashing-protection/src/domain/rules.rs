//! # Slashing Rules - Double-Vote and Surround-Vote Detection
//!
//! Pure functions deciding whether a new vote is safe against the stored
//! watermark of the same key.
//!
//! ## Attestations
//!
//! Checks run in a fixed order so that a vote matching several rules is
//! always reported the same way:
//!
//! 1. `source > target` is malformed (`InvalidEpochOrder`), no history needed.
//! 2. `stored.source < source && target < stored.target` is surrounded.
//! 3. `target <= stored.target` is a double vote.
//! 4. `source < stored.source && target > stored.target` is surrounding.
//!
//! ## Proposals
//!
//! A proposal is accepted only for a slot strictly above the stored one.

use crate::domain::vote_record::AttestationVote;
use shared_types::{Epoch, Slot};
use thiserror::Error;

/// Why a vote was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SlashingViolation {
    #[error("attestation source epoch {source_epoch} is after target epoch {target_epoch}")]
    InvalidEpochOrder {
        source_epoch: Epoch,
        target_epoch: Epoch,
    },

    #[error("double vote: target epoch {target_epoch} is not above last signed target {last_target_epoch}")]
    DoubleVote {
        target_epoch: Epoch,
        last_target_epoch: Epoch,
    },

    #[error("surrounding vote: ({source_epoch}, {target_epoch}) surrounds last signed ({last_source_epoch}, {last_target_epoch})")]
    SurroundingVote {
        source_epoch: Epoch,
        target_epoch: Epoch,
        last_source_epoch: Epoch,
        last_target_epoch: Epoch,
    },

    #[error("surrounded vote: ({source_epoch}, {target_epoch}) is surrounded by last signed ({last_source_epoch}, {last_target_epoch})")]
    SurroundedVote {
        source_epoch: Epoch,
        target_epoch: Epoch,
        last_source_epoch: Epoch,
        last_target_epoch: Epoch,
    },

    #[error("double proposal: slot {slot} is not above last signed slot {last_slot}")]
    DoubleProposal { slot: Slot, last_slot: Slot },
}

/// Outcome of a validate-and-record call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Vote recorded durably; signing may proceed.
    Accept,
    /// Vote refused; nothing was recorded.
    Reject(SlashingViolation),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// Check an attestation `(source_epoch, target_epoch)` against the last
/// accepted one.
pub fn check_attestation(
    last: Option<&AttestationVote>,
    source_epoch: Epoch,
    target_epoch: Epoch,
) -> Result<(), SlashingViolation> {
    if source_epoch > target_epoch {
        return Err(SlashingViolation::InvalidEpochOrder {
            source_epoch,
            target_epoch,
        });
    }

    let Some(last) = last else {
        return Ok(());
    };

    if source_epoch > last.source_epoch && target_epoch < last.target_epoch {
        return Err(SlashingViolation::SurroundedVote {
            source_epoch,
            target_epoch,
            last_source_epoch: last.source_epoch,
            last_target_epoch: last.target_epoch,
        });
    }

    if target_epoch <= last.target_epoch {
        return Err(SlashingViolation::DoubleVote {
            target_epoch,
            last_target_epoch: last.target_epoch,
        });
    }

    // target > last.target holds from here on
    if source_epoch < last.source_epoch {
        return Err(SlashingViolation::SurroundingVote {
            source_epoch,
            target_epoch,
            last_source_epoch: last.source_epoch,
            last_target_epoch: last.target_epoch,
        });
    }

    Ok(())
}

/// Check a proposal slot against the last accepted one.
pub fn check_proposal(last_slot: Option<Slot>, slot: Slot) -> Result<(), SlashingViolation> {
    match last_slot {
        Some(last_slot) if slot <= last_slot => {
            Err(SlashingViolation::DoubleProposal { slot, last_slot })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Domain;

    fn last(source_epoch: Epoch, target_epoch: Epoch) -> AttestationVote {
        AttestationVote {
            source_epoch,
            target_epoch,
            domain: Domain::default(),
        }
    }

    #[test]
    fn test_first_attestation_is_baseline() {
        assert_eq!(check_attestation(None, 0, 0), Ok(()));
        assert_eq!(check_attestation(None, 100, 4000), Ok(()));
    }

    #[test]
    fn test_invalid_epoch_order_rejected_without_history() {
        assert_eq!(
            check_attestation(None, 5, 4),
            Err(SlashingViolation::InvalidEpochOrder {
                source_epoch: 5,
                target_epoch: 4
            })
        );
    }

    #[test]
    fn test_double_vote() {
        let stored = last(2, 3);
        assert!(matches!(
            check_attestation(Some(&stored), 2, 3),
            Err(SlashingViolation::DoubleVote { .. })
        ));
        assert!(matches!(
            check_attestation(Some(&stored), 0, 2),
            Err(SlashingViolation::DoubleVote { .. })
        ));
        assert_eq!(check_attestation(Some(&stored), 3, 4), Ok(()));
    }

    #[test]
    fn test_surrounding_vote() {
        // stored (2, 3), new (1, 4) encloses it
        assert_eq!(
            check_attestation(Some(&last(2, 3)), 1, 4),
            Err(SlashingViolation::SurroundingVote {
                source_epoch: 1,
                target_epoch: 4,
                last_source_epoch: 2,
                last_target_epoch: 3
            })
        );
    }

    #[test]
    fn test_surrounded_vote() {
        // stored (1, 10), new (2, 5) sits inside it
        assert_eq!(
            check_attestation(Some(&last(1, 10)), 2, 5),
            Err(SlashingViolation::SurroundedVote {
                source_epoch: 2,
                target_epoch: 5,
                last_source_epoch: 1,
                last_target_epoch: 10
            })
        );
    }

    #[test]
    fn test_shared_source_is_not_surround() {
        assert_eq!(check_attestation(Some(&last(2, 3)), 2, 9), Ok(()));
    }

    #[test]
    fn test_proposal_slot_must_increase() {
        assert_eq!(check_proposal(None, 0), Ok(()));
        assert_eq!(check_proposal(Some(10), 11), Ok(()));
        assert_eq!(
            check_proposal(Some(10), 10),
            Err(SlashingViolation::DoubleProposal {
                slot: 10,
                last_slot: 10
            })
        );
        assert!(check_proposal(Some(10), 3).is_err());
    }
}
