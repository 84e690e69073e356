//! # kv-02-slashing-protection
//!
//! Slashing Protection Engine: the component that stands between a signing
//! request and the key that would sign it.
//!
//! ## Overview
//!
//! For every validator public key the engine keeps a **vote record**: the
//! last accepted attestation `(source_epoch, target_epoch)` and the last
//! accepted proposal slot. A new vote is checked against that record and,
//! if safe, the record is overwritten and persisted before the caller is
//! allowed to sign.
//!
//! ## Flow
//!
//! ```text
//! Gateway (5) ──validate_and_record_*──→ SlashingProtection
//!                                            │
//!                                            ├── per-key lock
//!                                            ├── SlashingStore::load
//!                                            ├── rules::check_*
//!                                            └── SlashingStore::save ──→ KeyValueStore (1)
//! ```
//!
//! ## Rules
//!
//! | Vote | Rejected when | Violation |
//! |------|---------------|-----------|
//! | Attestation | `source > target` | `InvalidEpochOrder` |
//! | Attestation | strictly inside the stored range | `SurroundedVote` |
//! | Attestation | `target <= stored.target` | `DoubleVote` |
//! | Attestation | strictly encloses the stored range | `SurroundingVote` |
//! | Proposal | `slot <= stored.slot` | `DoubleProposal` |
//!
//! ## Example
//!
//! ```rust,ignore
//! use kv_01_storage::InMemoryKVStore;
//! use kv_02_slashing_protection::{KvSlashingStore, SlashingProtection, Verdict};
//!
//! let engine = SlashingProtection::new(KvSlashingStore::new(InMemoryKVStore::new()));
//! match engine.validate_and_record_attestation(&pubkey, &domain, &data)? {
//!     Verdict::Accept => { /* safe to sign */ }
//!     Verdict::Reject(violation) => return Err(violation.into()),
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::KvSlashingStore;
pub use domain::{AttestationVote, SlashingViolation, Verdict, VoteRecord};
pub use error::{SlashingError, SlashingResult};
pub use ports::{SlashingProtectionApi, SlashingStore};
pub use service::SlashingProtection;
