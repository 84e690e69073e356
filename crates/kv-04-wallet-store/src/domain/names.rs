//! Wallet and account name rules.

use crate::error::{WalletError, WalletResult};

/// Longest accepted wallet or account name, in characters.
pub const MAX_NAME_LEN: usize = 128;

/// Names become path segments and storage key segments, so `/` is banned.
pub fn validate_name(name: &str) -> WalletResult<()> {
    let invalid = |reason| {
        Err(WalletError::InvalidName {
            name: name.to_string(),
            reason,
        })
    };

    if name.trim().is_empty() {
        return invalid("name is empty");
    }
    if name.chars().count() > MAX_NAME_LEN {
        return invalid("name is longer than 128 characters");
    }
    if name.contains('/') {
        return invalid("name contains '/'");
    }
    Ok(())
}
