//! # Deposit Data
//!
//! The payload a validator submits to the deposit contract.
//!
//! ```text
//! withdrawal_credentials = 0x00 ‖ sha256(withdrawal_pubkey)[1..]
//! domain                 = compute_domain(DOMAIN_DEPOSIT, fork_version, ZERO_ROOT)
//! signature              = sign(signing_root(hash_tree_root(DepositMessage), domain))
//! ```

use kv_03_key_manager::BlsKeyPair;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::ssz::{deposit_data_root, DepositMessage, DOMAIN_DEPOSIT};
use shared_types::{
    compute_domain, compute_signing_root, encode_hex, hash_tree_root, BlsPublicKey, BlsSignature,
    Root,
};

use crate::domain::Network;

/// 32 ETH in Gwei.
pub const DEPOSIT_AMOUNT_GWEI: u64 = 32_000_000_000;

const BLS_WITHDRAWAL_PREFIX: u8 = 0x00;

/// Signed deposit for one validator key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositData {
    pub public_key: BlsPublicKey,
    pub withdrawal_credentials: Root,
    pub amount: u64,
    pub signature: BlsSignature,
    pub deposit_message_root: Root,
    pub deposit_data_root: Root,
    /// Hex, 4 bytes.
    pub fork_version: String,
}

fn withdrawal_credentials(withdrawal_public_key: &BlsPublicKey) -> Root {
    let digest = Sha256::digest(withdrawal_public_key.as_bytes());
    let mut credentials = [0u8; 32];
    credentials.copy_from_slice(&digest);
    credentials[0] = BLS_WITHDRAWAL_PREFIX;
    Root(credentials)
}

pub(crate) fn build_deposit_data(
    validation_key: &BlsKeyPair,
    withdrawal_public_key: &BlsPublicKey,
    network: Network,
) -> DepositData {
    let message = DepositMessage {
        public_key: validation_key.public_key(),
        withdrawal_credentials: withdrawal_credentials(withdrawal_public_key),
        amount: DEPOSIT_AMOUNT_GWEI,
    };

    let fork_version = network.fork_version();
    let domain = compute_domain(DOMAIN_DEPOSIT, fork_version, &Root::default());
    let message_root = hash_tree_root(&message);
    let signature = validation_key.sign(compute_signing_root(&message_root, &domain).as_bytes());

    DepositData {
        public_key: message.public_key,
        withdrawal_credentials: message.withdrawal_credentials,
        amount: message.amount,
        signature,
        deposit_message_root: message_root,
        deposit_data_root: deposit_data_root(&message, &signature),
        fork_version: encode_hex(&fork_version),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kv_03_key_manager::verify_signature;

    #[test]
    fn test_deposit_signature_verifies() {
        let validation = BlsKeyPair::generate().unwrap();
        let withdrawal = BlsKeyPair::generate().unwrap();

        let deposit = build_deposit_data(&validation, &withdrawal.public_key(), Network::Prater);

        let domain = compute_domain(DOMAIN_DEPOSIT, [0x00, 0x00, 0x10, 0x20], &Root::default());
        let signing_root = compute_signing_root(&deposit.deposit_message_root, &domain);
        assert!(verify_signature(
            &validation.public_key(),
            signing_root.as_bytes(),
            &deposit.signature
        ));
        assert_eq!(deposit.fork_version, "00001020");
        assert_eq!(deposit.amount, DEPOSIT_AMOUNT_GWEI);
    }

    #[test]
    fn test_withdrawal_credentials_prefix() {
        let key = BlsPublicKey([0x42; 48]);
        let credentials = withdrawal_credentials(&key);
        let digest = Sha256::digest(key.as_bytes());

        assert_eq!(credentials.0[0], 0x00);
        assert_eq!(&credentials.0[1..], &digest[1..]);
    }

    #[test]
    fn test_deposit_roots_consistent() {
        let validation = BlsKeyPair::generate().unwrap();
        let deposit = build_deposit_data(&validation, &BlsPublicKey([1; 48]), Network::Mainnet);

        let message = DepositMessage {
            public_key: deposit.public_key,
            withdrawal_credentials: deposit.withdrawal_credentials,
            amount: deposit.amount,
        };
        assert_eq!(hash_tree_root(&message), deposit.deposit_message_root);
        assert_eq!(
            deposit_data_root(&message, &deposit.signature),
            deposit.deposit_data_root
        );
    }
}
