//! # Domain Layer
//!
//! Pure slashing rules and the per-key vote record. No I/O.

pub mod rules;
pub mod vote_record;

pub use rules::{check_attestation, check_proposal, SlashingViolation, Verdict};
pub use vote_record::{AttestationVote, VoteRecord};
