//! Key manager adapters

mod local;
mod remote;

pub use local::LocalKeyManager;
pub use remote::{RemoteHttpWallet, RemoteWalletOptions, DEFAULT_REQUEST_TIMEOUT};
