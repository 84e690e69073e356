//! # Wallet Store Service
//!
//! CRUD over wallets and accounts on a shared `KeyValueStore`. Every
//! mutation holds the store write lock across its existence checks and its
//! write, so concurrent creates of the same name cannot both succeed.

use std::sync::Arc;

use kv_01_storage::{BatchOperation, KeyValueStore};
use kv_03_key_manager::{BlsKeyPair, BlsSecretKey, KeyManagerKind, LocalKeyManager};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{Account, BlsPublicKey, Wallet};
use tracing::info;

use crate::domain::records::{AccountRecord, WalletRecord};
use crate::domain::{build_deposit_data, validate_name, DepositData, Network};
use crate::error::{WalletError, WalletResult};

const WALLET_PREFIX: &str = "wallet/";
const ACCOUNT_PREFIX: &str = "account/";
const PUBKEY_PREFIX: &str = "pubkey/";

fn wallet_key(wallet: &str) -> Vec<u8> {
    format!("{}{}", WALLET_PREFIX, wallet).into_bytes()
}

fn accounts_prefix(wallet: &str) -> Vec<u8> {
    format!("{}{}/", ACCOUNT_PREFIX, wallet).into_bytes()
}

fn account_key(wallet: &str, account: &str) -> Vec<u8> {
    format!("{}{}/{}", ACCOUNT_PREFIX, wallet, account).into_bytes()
}

fn pubkey_key(public_key: &BlsPublicKey) -> Vec<u8> {
    format!("{}{}", PUBKEY_PREFIX, public_key.to_hex()).into_bytes()
}

fn encode<T: Serialize>(key: &[u8], value: &T) -> WalletResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| WalletError::Encoding {
        key: String::from_utf8_lossy(key).into_owned(),
        reason: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(key: &[u8], bytes: &[u8]) -> WalletResult<T> {
    bincode::deserialize(bytes).map_err(|e| WalletError::Encoding {
        key: String::from_utf8_lossy(key).into_owned(),
        reason: e.to_string(),
    })
}

/// Wallet and account store.
pub struct WalletStore<K: KeyValueStore> {
    kv: Arc<RwLock<K>>,
    network: Network,
}

impl<K: KeyValueStore> WalletStore<K> {
    pub fn new(kv: K, network: Network) -> Self {
        Self::shared(Arc::new(RwLock::new(kv)), network)
    }

    /// Use a store that other components also hold.
    pub fn shared(kv: Arc<RwLock<K>>, network: Network) -> Self {
        Self { kv, network }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    // =========================================================================
    // WALLETS
    // =========================================================================

    pub fn create_wallet(&self, name: &str) -> WalletResult<Wallet> {
        validate_name(name)?;
        let key = wallet_key(name);

        let mut kv = self.kv.write();
        if kv.exists(&key)? {
            return Err(WalletError::WalletExists(name.to_string()));
        }
        let record = WalletRecord {
            name: name.to_string(),
        };
        kv.put(&key, &encode(&key, &record)?)?;

        info!(wallet = name, "[kv-04] 👛 Created wallet");
        Ok(Wallet {
            name: name.to_string(),
            accounts: Vec::new(),
        })
    }

    /// Wallet with its account names, or `None` if absent.
    pub fn get_wallet(&self, name: &str) -> WalletResult<Option<Wallet>> {
        let kv = self.kv.read();
        let key = wallet_key(name);
        let Some(bytes) = kv.get(&key)? else {
            return Ok(None);
        };
        let record: WalletRecord = decode(&key, &bytes)?;
        let accounts = Self::scan_accounts(&*kv, name)?
            .iter()
            .map(|r| r.name.clone())
            .collect();

        Ok(Some(Wallet {
            name: record.name,
            accounts,
        }))
    }

    /// Wallet names, sorted.
    pub fn list_wallets(&self) -> WalletResult<Vec<String>> {
        let entries = self.kv.read().prefix_scan(WALLET_PREFIX.as_bytes())?;
        entries
            .iter()
            .map(|(key, value)| decode::<WalletRecord>(key, value).map(|r| r.name))
            .collect()
    }

    // =========================================================================
    // ACCOUNTS
    // =========================================================================

    /// Create an account with a freshly generated validation key and
    /// withdrawal key.
    pub fn create_account(&self, wallet: &str, name: &str) -> WalletResult<Account> {
        validate_name(name)?;

        let mut kv = self.kv.write();
        Self::require_wallet(&*kv, wallet)?;

        let key = account_key(wallet, name);
        if kv.exists(&key)? {
            return Err(WalletError::AccountExists(name.to_string()));
        }

        let validation = BlsKeyPair::generate()?;
        let withdrawal = BlsKeyPair::generate()?;
        let public_key = validation.public_key();

        let index_key = pubkey_key(&public_key);
        if kv.exists(&index_key)? {
            return Err(WalletError::DuplicatePublicKey(public_key));
        }

        let record = AccountRecord {
            name: name.to_string(),
            wallet_name: wallet.to_string(),
            public_key,
            secret_key: *validation.secret().as_bytes(),
            withdrawal_public_key: withdrawal.public_key(),
            withdrawal_secret_key: *withdrawal.secret().as_bytes(),
        };

        kv.atomic_batch_write(vec![
            BatchOperation::put(key.clone(), encode(&key, &record)?),
            BatchOperation::put(index_key, format!("{}/{}", wallet, name).into_bytes()),
        ])?;

        info!(
            wallet,
            account = name,
            public_key = %public_key,
            "[kv-04] 🔑 Created account"
        );
        Ok(record.account())
    }

    /// Account by name. Unknown wallet is an error; unknown account is `None`.
    pub fn get_account(&self, wallet: &str, name: &str) -> WalletResult<Option<Account>> {
        let kv = self.kv.read();
        Ok(Self::load_account(&*kv, wallet, name)?.map(|r| r.account()))
    }

    /// Accounts of `wallet`, sorted by name.
    pub fn list_accounts(&self, wallet: &str) -> WalletResult<Vec<Account>> {
        let kv = self.kv.read();
        Self::require_wallet(&*kv, wallet)?;
        Ok(Self::scan_accounts(&*kv, wallet)?
            .iter()
            .map(AccountRecord::account)
            .collect())
    }

    /// Deposit data for an account on the configured network.
    pub fn get_deposit_data(&self, wallet: &str, name: &str) -> WalletResult<Option<DepositData>> {
        let record = {
            let kv = self.kv.read();
            Self::load_account(&*kv, wallet, name)?
        };
        let Some(record) = record else {
            return Ok(None);
        };

        let validation = BlsKeyPair::from_secret(&BlsSecretKey::from_bytes(record.secret_key))?;
        Ok(Some(build_deposit_data(
            &validation,
            &record.withdrawal_public_key,
            self.network,
        )))
    }

    /// Account owning `public_key`, via the public-key index.
    pub fn account_by_public_key(&self, public_key: &BlsPublicKey) -> WalletResult<Option<Account>> {
        let kv = self.kv.read();
        Ok(Self::record_by_public_key(&*kv, public_key)?.map(|r| r.account()))
    }

    /// Local key manager for the account owning `public_key`.
    pub fn key_manager_for(&self, public_key: &BlsPublicKey) -> WalletResult<Option<KeyManagerKind>> {
        let record = {
            let kv = self.kv.read();
            Self::record_by_public_key(&*kv, public_key)?
        };
        let Some(record) = record else {
            return Ok(None);
        };

        let pair = BlsKeyPair::from_secret(&BlsSecretKey::from_bytes(record.secret_key))?;
        Ok(Some(KeyManagerKind::local(LocalKeyManager::with_key(pair))))
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn require_wallet(kv: &K, wallet: &str) -> WalletResult<()> {
        if !kv.exists(&wallet_key(wallet))? {
            return Err(WalletError::WalletNotFound {
                name: wallet.to_string(),
            });
        }
        Ok(())
    }

    fn load_account(kv: &K, wallet: &str, name: &str) -> WalletResult<Option<AccountRecord>> {
        Self::require_wallet(kv, wallet)?;
        let key = account_key(wallet, name);
        kv.get(&key)?.map(|bytes| decode(&key, &bytes)).transpose()
    }

    fn scan_accounts(kv: &K, wallet: &str) -> WalletResult<Vec<AccountRecord>> {
        kv.prefix_scan(&accounts_prefix(wallet))?
            .iter()
            .map(|(key, value)| decode(key, value))
            .collect()
    }

    fn record_by_public_key(
        kv: &K,
        public_key: &BlsPublicKey,
    ) -> WalletResult<Option<AccountRecord>> {
        let index_key = pubkey_key(public_key);
        let Some(path) = kv.get(&index_key)? else {
            return Ok(None);
        };

        let path = String::from_utf8(path).map_err(|e| WalletError::Encoding {
            key: String::from_utf8_lossy(&index_key).into_owned(),
            reason: e.to_string(),
        })?;
        let key = format!("{}{}", ACCOUNT_PREFIX, path).into_bytes();
        kv.get(&key)?.map(|bytes| decode(&key, &bytes)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kv_01_storage::{FileBackedKVStore, InMemoryKVStore};
    use kv_03_key_manager::{verify_signature, KeyManager};
    use shared_types::{compute_signing_root, Domain, Root};

    fn store() -> WalletStore<InMemoryKVStore> {
        WalletStore::new(InMemoryKVStore::new(), Network::Mainnet)
    }

    fn store_with_account() -> (WalletStore<InMemoryKVStore>, Account) {
        let store = store();
        store.create_wallet("wallet1").unwrap();
        let account = store.create_account("wallet1", "account1").unwrap();
        (store, account)
    }

    #[test]
    fn test_create_wallet_twice() {
        let store = store();
        store.create_wallet("wallet1").unwrap();

        let err = store.create_wallet("wallet1").unwrap_err();
        assert_eq!(err.to_string(), "wallet \"wallet1\" already exists");
    }

    #[test]
    fn test_list_wallets_sorted() {
        let store = store();
        for name in ["beta", "alpha", "gamma"] {
            store.create_wallet(name).unwrap();
        }
        assert_eq!(store.list_wallets().unwrap(), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_get_wallet_lists_accounts() {
        let (store, _) = store_with_account();
        store.create_account("wallet1", "account0").unwrap();

        let wallet = store.get_wallet("wallet1").unwrap().unwrap();
        assert_eq!(wallet.accounts, vec!["account0", "account1"]);
        assert_eq!(store.get_wallet("unknown_wallet").unwrap(), None);
    }

    #[test]
    fn test_create_account() {
        let (store, account) = store_with_account();
        assert_eq!(account.name, "account1");
        assert_eq!(account.wallet_name, "wallet1");

        let read = store.get_account("wallet1", "account1").unwrap();
        assert_eq!(read, Some(account));
    }

    #[test]
    fn test_create_account_with_existing_name() {
        let (store, _) = store_with_account();
        let err = store.create_account("wallet1", "account1").unwrap_err();
        assert_eq!(err.to_string(), "account \"account1\" already exists");
    }

    #[test]
    fn test_create_account_under_unknown_wallet() {
        let store = store();
        let err = store.create_account("unknown_wallet", "account1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to retrieve wallet by name: no wallet found"
        );
    }

    #[test]
    fn test_create_account_with_invalid_names() {
        let store = store();
        store.create_wallet("wallet1").unwrap();

        for name in [" ".to_string(), "".to_string(), "a/b".to_string(), "x".repeat(129)] {
            assert!(matches!(
                store.create_account("wallet1", &name),
                Err(WalletError::InvalidName { .. })
            ));
        }
    }

    #[test]
    fn test_read_unknown_account_and_wallet() {
        let (store, _) = store_with_account();
        assert_eq!(store.get_account("wallet1", "unknown_account").unwrap(), None);
        assert!(matches!(
            store.get_account("unknown_wallet", "account1"),
            Err(WalletError::WalletNotFound { .. })
        ));
    }

    #[test]
    fn test_list_accounts() {
        let (store, _) = store_with_account();
        store.create_account("wallet1", "account0").unwrap();

        let names: Vec<_> = store
            .list_accounts("wallet1")
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["account0", "account1"]);
        assert!(store.list_accounts("unknown_wallet").is_err());
    }

    #[test]
    fn test_accounts_do_not_leak_across_wallet_prefixes() {
        let store = store();
        store.create_wallet("w").unwrap();
        store.create_wallet("w2").unwrap();
        store.create_account("w2", "a").unwrap();

        assert!(store.list_accounts("w").unwrap().is_empty());
    }

    #[test]
    fn test_account_by_public_key() {
        let (store, account) = store_with_account();

        let found = store.account_by_public_key(&account.public_key).unwrap();
        assert_eq!(found, Some(account));
        assert_eq!(
            store.account_by_public_key(&BlsPublicKey([9; 48])).unwrap(),
            None
        );
    }

    #[test]
    fn test_deposit_data() {
        let (store, account) = store_with_account();

        let deposit = store.get_deposit_data("wallet1", "account1").unwrap().unwrap();
        assert_eq!(deposit.public_key, account.public_key);
        assert_eq!(deposit.fork_version, "00000000");
        assert_eq!(deposit.withdrawal_credentials.0[0], 0x00);

        assert_eq!(store.get_deposit_data("wallet1", "unknown_account").unwrap(), None);
        assert!(matches!(
            store.get_deposit_data("unknown_wallet", "account1"),
            Err(WalletError::WalletNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_key_manager_signs_for_account() {
        let (store, account) = store_with_account();
        let manager = store.key_manager_for(&account.public_key).unwrap().unwrap();

        let root = Root([3; 32]);
        let domain = Domain([4; 32]);
        let signature = manager
            .sign_generic(&account.public_key, &root, &domain)
            .await
            .unwrap();

        let signing_root = compute_signing_root(&root, &domain);
        assert!(verify_signature(&account.public_key, signing_root.as_bytes(), &signature));
        assert!(store.key_manager_for(&BlsPublicKey([1; 48])).unwrap().is_none());
    }

    #[test]
    fn test_accounts_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallets.db");

        let account = {
            let store = WalletStore::new(FileBackedKVStore::open(&path).unwrap(), Network::Holesky);
            store.create_wallet("wallet1").unwrap();
            store.create_account("wallet1", "account1").unwrap()
        };

        let store = WalletStore::new(FileBackedKVStore::open(&path).unwrap(), Network::Holesky);
        assert_eq!(
            store.account_by_public_key(&account.public_key).unwrap(),
            Some(account)
        );
        let deposit = store.get_deposit_data("wallet1", "account1").unwrap().unwrap();
        assert_eq!(deposit.fork_version, "01017000");
    }
}
