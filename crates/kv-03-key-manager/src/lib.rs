//! # kv-03-key-manager
//!
//! The `KeyManager` capability set and its two realizations.
//!
//! ## Capabilities
//!
//! | Operation | Local | RemoteHttp |
//! |-----------|-------|------------|
//! | `sign` | signs the root as-is | `UnprotectedSigningUnsupported` |
//! | `sign_generic` | signs `signing_root(root, domain)` | POST aggregation route |
//! | `sign_proposal` | signs the header signing root | POST proposal route |
//! | `sign_attestation` | signs the attestation signing root | POST attestation route |
//! | `fetch_validating_keys` | every loaded key | the configured key |
//!
//! ## Remote Wallet
//!
//! A `RemoteHttpWallet` is bound to exactly one public key. A request for
//! any other key fails with `NoSuchKey` before a socket is opened. Each call
//! is one bearer-authenticated JSON round trip; non-200 answers surface as
//! `Transport` errors and are never retried.
//!
//! ```text
//! KeyManagerKind ─┬─ Local ───────→ blst (in process)
//!                 └─ RemoteHttp ──→ POST {location}{base}/accounts/sign/*
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod kind;
pub mod ports;
pub mod protocol;

pub use adapters::{LocalKeyManager, RemoteHttpWallet, RemoteWalletOptions};
pub use domain::{verify_signature, BlsKeyPair, BlsSecretKey, BLS_DST};
pub use error::{KeyManagerError, KeyManagerResult};
pub use kind::KeyManagerKind;
pub use ports::KeyManager;
pub use protocol::SigningRoutes;
