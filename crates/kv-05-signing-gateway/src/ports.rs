//! # Gateway Ports
//!
//! Driven ports the gateway is wired against. The wallet store is the
//! production implementation of both (see `adapters`).

use std::sync::Arc;

use kv_03_key_manager::KeyManager;
use kv_04_wallet_store::{DepositData, WalletResult};
use shared_types::{Account, BlsPublicKey, Wallet};

use crate::error::GatewayResult;

/// Finds the key manager able to sign for a public key.
pub trait KeyManagerResolver: Send + Sync {
    /// `None` when no account owns `public_key`.
    fn resolve(&self, public_key: &BlsPublicKey) -> GatewayResult<Option<Arc<dyn KeyManager>>>;
}

/// Wallet and account namespace served over HTTP.
pub trait WalletDirectory: Send + Sync {
    fn create_wallet(&self, name: &str) -> WalletResult<Wallet>;
    fn get_wallet(&self, name: &str) -> WalletResult<Option<Wallet>>;
    fn list_wallets(&self) -> WalletResult<Vec<String>>;
    fn create_account(&self, wallet: &str, name: &str) -> WalletResult<Account>;
    fn get_account(&self, wallet: &str, name: &str) -> WalletResult<Option<Account>>;
    fn list_accounts(&self, wallet: &str) -> WalletResult<Vec<Account>>;
    fn get_deposit_data(&self, wallet: &str, name: &str) -> WalletResult<Option<DepositData>>;
}
