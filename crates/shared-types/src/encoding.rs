//! # Hex Wire Codec
//!
//! Fixed-width byte fields travel as lower-case hex without a `0x` prefix.
//! Decoding is strict: a prefix, odd length or wrong width is an error.

use crate::errors::HexError;

/// Encode bytes as lower-case hex without prefix.
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a hex string into exactly `N` bytes.
///
/// `field` is the wire name of the value, reported back on failure.
pub fn decode_fixed<const N: usize>(field: &str, value: &str) -> Result<[u8; N], HexError> {
    let bytes = hex::decode(value).map_err(|e| HexError::InvalidHex {
        field: field.to_string(),
        reason: e.to_string(),
    })?;

    if bytes.len() != N {
        return Err(HexError::InvalidLength {
            field: field.to_string(),
            expected: N,
            actual: bytes.len(),
        });
    }

    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_is_lowercase_without_prefix() {
        assert_eq!(encode_hex(&[0xAB, 0x01]), "ab01");
    }

    #[test]
    fn test_decode_exact_width() {
        let bytes: [u8; 2] = decode_fixed("root", "ab01").unwrap();
        assert_eq!(bytes, [0xAB, 0x01]);
    }

    #[test]
    fn test_decode_rejects_prefix() {
        let err = decode_fixed::<2>("root", "0xab01").unwrap_err();
        assert_eq!(err.field(), "root");
        assert!(matches!(err, HexError::InvalidHex { .. }));
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let err = decode_fixed::<4>("domain", "ab01").unwrap_err();
        assert_eq!(
            err,
            HexError::InvalidLength {
                field: "domain".into(),
                expected: 4,
                actual: 2,
            }
        );
    }
}
