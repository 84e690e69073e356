//! BLS12-381 key material
//!
//! `min_pk` variant: 48-byte public keys, 96-byte signatures, with the
//! Ethereum proof-of-possession ciphersuite.

use std::fmt;

use blst::min_pk::{PublicKey, SecretKey, Signature};
use blst::BLST_ERROR;
use rand::RngCore;
use shared_types::{BlsPublicKey, BlsSignature};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{KeyManagerError, KeyManagerResult};

/// Domain separation tag for BLS signatures (Ethereum consensus compatible)
pub const BLS_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// Raw 32-byte BLS secret key, wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct BlsSecretKey([u8; 32]);

impl BlsSecretKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for BlsSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BlsSecretKey(<redacted>)")
    }
}

/// BLS key pair for signing operations
pub struct BlsKeyPair {
    secret: SecretKey,
    public_key: BlsPublicKey,
}

impl BlsKeyPair {
    /// Generate a new random key pair
    pub fn generate() -> KeyManagerResult<Self> {
        let mut ikm = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut ikm);
        let secret = SecretKey::key_gen(&ikm, &[]);
        ikm.zeroize();

        let secret = secret.map_err(|e| KeyManagerError::Bls(format!("key_gen: {:?}", e)))?;
        Ok(Self::from_blst(secret))
    }

    /// Create from existing secret key bytes
    pub fn from_secret(secret: &BlsSecretKey) -> KeyManagerResult<Self> {
        let secret = SecretKey::from_bytes(secret.as_bytes())
            .map_err(|e| KeyManagerError::Bls(format!("invalid secret key: {:?}", e)))?;
        Ok(Self::from_blst(secret))
    }

    fn from_blst(secret: SecretKey) -> Self {
        let public_key = BlsPublicKey(secret.sk_to_pk().to_bytes());
        Self { secret, public_key }
    }

    pub fn public_key(&self) -> BlsPublicKey {
        self.public_key
    }

    /// Copy of the secret bytes, for persistence.
    pub fn secret(&self) -> BlsSecretKey {
        BlsSecretKey(self.secret.to_bytes())
    }

    /// Sign a message
    pub fn sign(&self, message: &[u8]) -> BlsSignature {
        BlsSignature(self.secret.sign(message, BLS_DST, &[]).to_bytes())
    }
}

impl fmt::Debug for BlsKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlsKeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// Verify `signature` over `message` for `public_key`.
///
/// Malformed keys or signatures verify as `false`.
pub fn verify_signature(
    public_key: &BlsPublicKey,
    message: &[u8],
    signature: &BlsSignature,
) -> bool {
    let (Ok(pk), Ok(sig)) = (
        PublicKey::from_bytes(public_key.as_bytes()),
        Signature::from_bytes(signature.as_bytes()),
    ) else {
        return false;
    };
    sig.verify(true, message, BLS_DST, &[], &pk, true) == BLST_ERROR::BLST_SUCCESS
}
