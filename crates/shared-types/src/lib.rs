//! # Shared Types Crate
//!
//! This crate contains the fixed-width byte types, beacon-chain message types
//! and hex wire codec shared by every key-vault subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the wire form of keys, roots, domains and
//!   signatures is defined once here (lower-case hex, no `0x` prefix,
//!   fixed length).
//! - **Field-Named Failures**: every hex decode failure names the field that
//!   carried the bad value.
//! - **Consensus Compatibility**: signing roots follow the Ethereum SSZ
//!   `hash_tree_root` rules so signatures interoperate with beacon nodes.

pub mod encoding;
pub mod entities;
pub mod errors;
pub mod ssz;

pub use encoding::{decode_fixed, encode_hex};
pub use entities::*;
pub use errors::HexError;
pub use ssz::{compute_domain, compute_signing_root, hash_tree_root, TreeHash};
