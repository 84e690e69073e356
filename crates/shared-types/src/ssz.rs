//! # SSZ Merkleization
//!
//! `hash_tree_root` comes from the `tree_hash` crate: fixed byte types
//! implement it as SSZ byte vectors, containers derive it. This module adds
//! the signing-root and domain helpers from the consensus specs.
//!
//! ```text
//! signing_root = hash_tree_root(SigningData { object_root, domain })
//! domain       = domain_type ++ hash_tree_root(ForkData { fork_version, gvr })[..28]
//! ```

use tree_hash_derive::TreeHash;

pub use tree_hash::TreeHash;

use crate::entities::{BlsPublicKey, BlsSignature, Domain, Root};

pub const DOMAIN_BEACON_PROPOSER: [u8; 4] = [0x00, 0x00, 0x00, 0x00];
pub const DOMAIN_BEACON_ATTESTER: [u8; 4] = [0x01, 0x00, 0x00, 0x00];
pub const DOMAIN_DEPOSIT: [u8; 4] = [0x03, 0x00, 0x00, 0x00];

/// SSZ `hash_tree_root` of `value`.
pub fn hash_tree_root<T: TreeHash>(value: &T) -> Root {
    Root(value.tree_hash_root().0)
}

#[derive(TreeHash)]
struct SigningData {
    object_root: Root,
    domain: Domain,
}

#[derive(TreeHash)]
struct ForkData {
    current_version: [u8; 4],
    genesis_validators_root: Root,
}

/// Root that is actually signed: the object root bound to its domain.
pub fn compute_signing_root(object_root: &Root, domain: &Domain) -> Root {
    hash_tree_root(&SigningData {
        object_root: *object_root,
        domain: *domain,
    })
}

/// Build a signature domain from its type, fork version and genesis root.
pub fn compute_domain(
    domain_type: [u8; 4],
    fork_version: [u8; 4],
    genesis_validators_root: &Root,
) -> Domain {
    let fork_data_root = hash_tree_root(&ForkData {
        current_version: fork_version,
        genesis_validators_root: *genesis_validators_root,
    });

    let mut domain = [0u8; 32];
    domain[..4].copy_from_slice(&domain_type);
    domain[4..].copy_from_slice(&fork_data_root.0[..28]);
    Domain(domain)
}

/// Deposit message signed by the validator key when joining the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TreeHash)]
pub struct DepositMessage {
    pub public_key: BlsPublicKey,
    pub withdrawal_credentials: Root,
    /// Deposit amount in Gwei.
    pub amount: u64,
}

#[derive(TreeHash)]
struct DepositDataContainer {
    public_key: BlsPublicKey,
    withdrawal_credentials: Root,
    amount: u64,
    signature: BlsSignature,
}

/// Root of the full deposit data (message fields plus signature).
pub fn deposit_data_root(message: &DepositMessage, signature: &BlsSignature) -> Root {
    hash_tree_root(&DepositDataContainer {
        public_key: message.public_key,
        withdrawal_credentials: message.withdrawal_credentials,
        amount: message.amount,
        signature: *signature,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AttestationData, BeaconBlockHeader, Checkpoint};

    #[test]
    fn test_mainnet_deposit_domain() {
        let domain = compute_domain(DOMAIN_DEPOSIT, [0, 0, 0, 0], &Root::default());
        assert_eq!(
            domain.to_hex(),
            "03000000f5a5fd42d16a20302798ef6ed309979b43003d2320d9f0e8ea9831a9"
        );
    }

    #[test]
    fn test_checkpoint_root() {
        let checkpoint = Checkpoint {
            epoch: 3,
            root: Root([0x11; 32]),
        };
        assert_eq!(
            hash_tree_root(&checkpoint).to_hex(),
            "8d7ec135ffb397a99e8b3794c3adf61271572d368226dc807636996c30776aa6"
        );
    }

    #[test]
    fn test_block_header_root() {
        let header = BeaconBlockHeader {
            slot: 1,
            proposer_index: 2,
            parent_root: Root([0x01; 32]),
            state_root: Root([0x02; 32]),
            body_root: Root([0x03; 32]),
        };
        assert_eq!(
            hash_tree_root(&header).to_hex(),
            "bb3917003756216bccee4f87d53d4e52b948b8190b14a552cb1e78fcede06dd5"
        );
    }

    #[test]
    fn test_signing_root_depends_on_domain() {
        let header = BeaconBlockHeader {
            slot: 10,
            ..Default::default()
        };
        let root = hash_tree_root(&header);
        let a = compute_signing_root(&root, &Domain([1; 32]));
        let b = compute_signing_root(&root, &Domain([2; 32]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_attestation_root_covers_target() {
        let mut data = AttestationData::default();
        let before = hash_tree_root(&data);
        data.target.epoch = 1;
        assert_ne!(before, hash_tree_root(&data));
    }
}
