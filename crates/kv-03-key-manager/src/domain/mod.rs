pub mod keys;

pub use keys::{verify_signature, BlsKeyPair, BlsSecretKey, BLS_DST};
