//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Bytes**: `BlsPublicKey`, `BlsSignature`, `Root`, `Domain`
//! - **Consensus messages**: `Checkpoint`, `BeaconBlockHeader`, `AttestationData`
//! - **Key namespace**: `Wallet`, `Account`

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tree_hash::{merkle_root, Hash256, PackedEncoding, TreeHashType};
use tree_hash_derive::TreeHash;

use crate::encoding::{decode_fixed, encode_hex};
use crate::errors::HexError;

/// Beacon chain slot number.
pub type Slot = u64;

/// Beacon chain epoch number.
pub type Epoch = u64;

/// Fixed-width values decodable from wire hex.
pub trait FixedHex: Sized {
    fn from_hex(field: &str, value: &str) -> Result<Self, HexError>;
}

/// Deserialize a fixed-width hex value, naming `field` on failure.
///
/// For `#[serde(deserialize_with)]` wrappers in wire schemas, where the
/// type-level impl cannot know the field it sits in.
pub fn deserialize_field<'de, D, T>(field: &str, deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FixedHex,
{
    let value = String::deserialize(deserializer)?;
    T::from_hex(field, &value).map_err(serde::de::Error::custom)
}

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Width in bytes.
            pub const LEN: usize = $len;

            /// Decode from wire hex, naming `field` on failure.
            pub fn from_hex(field: &str, value: &str) -> Result<Self, HexError> {
                decode_fixed::<$len>(field, value).map(Self)
            }

            /// Lower-case hex without prefix.
            pub fn to_hex(&self) -> String {
                encode_hex(&self.0)
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self([0u8; $len])
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl FixedHex for $name {
            fn from_hex(field: &str, value: &str) -> Result<Self, HexError> {
                $name::from_hex(field, value)
            }
        }

        /// SSZ byte vector of the fixed width.
        impl tree_hash::TreeHash for $name {
            fn tree_hash_type() -> TreeHashType {
                TreeHashType::Vector
            }

            fn tree_hash_packed_encoding(&self) -> PackedEncoding {
                PackedEncoding::from_slice(&self.0)
            }

            fn tree_hash_packing_factor() -> usize {
                1
            }

            fn tree_hash_root(&self) -> Hash256 {
                merkle_root(&self.0, 0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                Self::from_hex(stringify!($name), &value).map_err(serde::de::Error::custom)
            }
        }
    };
}

fixed_bytes!(
    /// 48-byte compressed BLS12-381 public key.
    BlsPublicKey,
    48
);

fixed_bytes!(
    /// 96-byte compressed BLS12-381 signature.
    BlsSignature,
    96
);

fixed_bytes!(
    /// 32-byte SSZ root.
    Root,
    32
);

fixed_bytes!(
    /// 32-byte signature domain (context separation value).
    Domain,
    32
);

// =============================================================================
// CONSENSUS MESSAGES
// =============================================================================

/// FFG checkpoint: an epoch and the block root at its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TreeHash)]
pub struct Checkpoint {
    pub epoch: Epoch,
    pub root: Root,
}

/// Beacon block header, the object signed for a block proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TreeHash)]
#[serde(rename_all = "camelCase")]
pub struct BeaconBlockHeader {
    pub slot: Slot,
    pub proposer_index: u64,
    pub parent_root: Root,
    pub state_root: Root,
    pub body_root: Root,
}

/// Attestation data, the object signed for an attestation vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TreeHash)]
#[serde(rename_all = "camelCase")]
pub struct AttestationData {
    pub slot: Slot,
    pub committee_index: u64,
    pub beacon_block_root: Root,
    pub source: Checkpoint,
    pub target: Checkpoint,
}

// =============================================================================
// KEY NAMESPACE
// =============================================================================

/// A named wallet holding a collection of accounts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Wallet {
    pub name: String,
    /// Names of the accounts in this wallet.
    pub accounts: Vec<String>,
}

/// One validator signing identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub name: String,
    pub public_key: BlsPublicKey,
    pub wallet_name: String,
}
