//! # kv-05-signing-gateway
//!
//! Protected signing: resolve the key, let the slashing engine validate and
//! durably record the vote, and only then ask the key manager to sign.
//!
//! ## Flow
//!
//! ```text
//! HTTP (axum) ──→ SigningGateway ──resolve──→ KeyManagerResolver (4)
//!                      │
//!                      ├── validate_and_record ──→ SlashingProtection (2)
//!                      │        Reject ⇒ 409, signer never called
//!                      │
//!                      └── sign_* ──→ KeyManager (3)
//! ```
//!
//! ## HTTP Interface
//!
//! Mounted under `SigningRoutes::base_path` (default `/v1/ethereum`).
//! Every route requires `Authorization: Bearer <token>`.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET | `/version` | vault version |
//! | GET | `/config` | network and fork version |
//! | GET | `/wallets` | list wallets |
//! | POST, GET | `/wallets/{wallet}` | create / read wallet |
//! | GET | `/wallets/{wallet}/accounts` | list accounts |
//! | POST, GET | `/wallets/{wallet}/accounts/{account}` | create / read account |
//! | GET | `/wallets/{wallet}/accounts/{account}/deposit-data` | deposit data |
//! | POST | `/accounts/sign/aggregation` | aggregation signature |
//! | POST | `/accounts/sign/proposal` | protected proposal signature |
//! | POST | `/accounts/sign/attestation` | protected attestation signature |
//! | GET, POST | `/storage/slashing` | export / import slashing history |
//!
//! Successful bodies are `{"data": ...}`; failures are
//! `{"errors": ["<message>"]}` with the status given by `ErrorKind`.

pub mod adapters;
pub mod error;
pub mod http;
pub mod ports;
pub mod service;

pub use error::{ErrorKind, GatewayError, GatewayResult};
pub use http::{build_router, AppState, HttpConfig, VaultInfo};
pub use ports::{KeyManagerResolver, WalletDirectory};
pub use service::SigningGateway;
