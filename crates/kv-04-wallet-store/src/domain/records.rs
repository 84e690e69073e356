//! Stored forms of wallets and accounts.

use serde::{Deserialize, Serialize};
use shared_types::{Account, BlsPublicKey};
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct WalletRecord {
    pub name: String,
}

/// Account plus its secret keys. Wiped on drop.
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub(crate) struct AccountRecord {
    #[zeroize(skip)]
    pub name: String,
    #[zeroize(skip)]
    pub wallet_name: String,
    #[zeroize(skip)]
    pub public_key: BlsPublicKey,
    pub secret_key: [u8; 32],
    #[zeroize(skip)]
    pub withdrawal_public_key: BlsPublicKey,
    pub withdrawal_secret_key: [u8; 32],
}

impl AccountRecord {
    pub fn account(&self) -> Account {
        Account {
            name: self.name.clone(),
            public_key: self.public_key,
            wallet_name: self.wallet_name.clone(),
        }
    }
}
