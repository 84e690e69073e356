//! # kv-04-wallet-store
//!
//! Hierarchical key namespace: wallets own accounts, accounts own one BLS
//! validation key each.
//!
//! ## Storage Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `wallet/<wallet>` | wallet record |
//! | `account/<wallet>/<account>` | account record incl. secret keys |
//! | `pubkey/<hex>` | `<wallet>/<account>` |
//!
//! An account record and its public-key index entry are written in one
//! atomic batch, so a key can never map to two accounts.
//!
//! Secret material is stored unencrypted; protect the data directory.

pub mod domain;
pub mod error;
pub mod store;

pub use domain::{validate_name, DepositData, Network, MAX_NAME_LEN};
pub use error::{WalletError, WalletResult};
pub use store::WalletStore;
