//! `WalletStore` as the gateway's resolver and wallet directory.

use std::sync::Arc;

use kv_01_storage::KeyValueStore;
use kv_03_key_manager::KeyManager;
use kv_04_wallet_store::{DepositData, WalletResult, WalletStore};
use shared_types::{Account, BlsPublicKey, Wallet};
use tracing::debug;

use crate::error::GatewayResult;
use crate::ports::{KeyManagerResolver, WalletDirectory};

impl<K: KeyValueStore> KeyManagerResolver for WalletStore<K> {
    fn resolve(&self, public_key: &BlsPublicKey) -> GatewayResult<Option<Arc<dyn KeyManager>>> {
        let Some(account) = self.account_by_public_key(public_key)? else {
            return Ok(None);
        };
        debug!(
            wallet = %account.wallet_name,
            account = %account.name,
            public_key = %public_key,
            "[kv-05] Resolved signing account"
        );

        Ok(self
            .key_manager_for(public_key)?
            .map(|manager| Arc::new(manager) as Arc<dyn KeyManager>))
    }
}

impl<K: KeyValueStore> WalletDirectory for WalletStore<K> {
    fn create_wallet(&self, name: &str) -> WalletResult<Wallet> {
        WalletStore::create_wallet(self, name)
    }

    fn get_wallet(&self, name: &str) -> WalletResult<Option<Wallet>> {
        WalletStore::get_wallet(self, name)
    }

    fn list_wallets(&self) -> WalletResult<Vec<String>> {
        WalletStore::list_wallets(self)
    }

    fn create_account(&self, wallet: &str, name: &str) -> WalletResult<Account> {
        WalletStore::create_account(self, wallet, name)
    }

    fn get_account(&self, wallet: &str, name: &str) -> WalletResult<Option<Account>> {
        WalletStore::get_account(self, wallet, name)
    }

    fn list_accounts(&self, wallet: &str) -> WalletResult<Vec<Account>> {
        WalletStore::list_accounts(self, wallet)
    }

    fn get_deposit_data(&self, wallet: &str, name: &str) -> WalletResult<Option<DepositData>> {
        WalletStore::get_deposit_data(self, wallet, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kv_01_storage::InMemoryKVStore;
    use kv_04_wallet_store::Network;

    #[tokio::test]
    async fn test_resolve_by_account_key() {
        let store = WalletStore::new(InMemoryKVStore::new(), Network::Mainnet);
        store.create_wallet("w").unwrap();
        let account = store.create_account("w", "a").unwrap();

        let manager = store.resolve(&account.public_key).unwrap().unwrap();
        assert_eq!(
            manager.fetch_validating_keys().await.unwrap(),
            vec![account.public_key]
        );
        assert!(store.resolve(&BlsPublicKey([7; 48])).unwrap().is_none());
    }
}
