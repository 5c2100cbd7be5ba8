//! EIP-55 mixed-case address checksums

use calldata_primitives::{strip_hex_prefix, Address};

use crate::{keccak256, CryptoError};

/// Render an address in EIP-55 checksum casing, with 0x prefix
///
/// Each hex letter is uppercased when the matching nibble of
/// `keccak256(lowercase_hex)` is 8 or above.
pub fn to_checksum(address: &Address) -> String {
    let lower = address.to_hex_digits();
    let hash = keccak256(lower.as_bytes());
    let hash = hash.as_bytes();

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// True when the hex digits contain both upper- and lowercase letters
pub fn has_mixed_case(s: &str) -> bool {
    let digits = strip_hex_prefix(s);
    digits.chars().any(|c| c.is_ascii_lowercase()) && digits.chars().any(|c| c.is_ascii_uppercase())
}

/// Check a mixed-case address string against its checksum
///
/// Returns false for strings that do not parse as an address.
pub fn is_valid_checksum(s: &str) -> bool {
    match Address::from_hex(s) {
        Ok(address) => strip_hex_prefix(&to_checksum(&address)) == strip_hex_prefix(s.trim()),
        Err(_) => false,
    }
}

/// Parse an address, enforcing EIP-55 when the input is mixed-case
///
/// All-lowercase and all-uppercase inputs carry no checksum and are
/// accepted on byte length alone.
pub fn parse_checksummed(s: &str) -> Result<Address, CryptoError> {
    let s = s.trim();
    let address = Address::from_hex(s)?;
    if has_mixed_case(s) {
        let expected = to_checksum(&address);
        if strip_hex_prefix(&expected) != strip_hex_prefix(s) {
            return Err(CryptoError::InvalidChecksum {
                expected,
                got: s.to_string(),
            });
        }
    }
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calldata_primitives::AddressError;

    // Vectors published with EIP-55
    const EIP55: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn test_to_checksum_eip55_vectors() {
        for vector in EIP55 {
            let address = Address::from_hex(vector).unwrap();
            assert_eq!(to_checksum(&address), vector);
        }
    }

    #[test]
    fn test_parse_checksummed_accepts_vectors() {
        for vector in EIP55 {
            assert!(parse_checksummed(vector).is_ok(), "{vector}");
            assert!(is_valid_checksum(vector));
        }
    }

    #[test]
    fn test_parse_checksummed_rejects_flipped_case() {
        // 'a' at index 3 of the first vector lowered from 'A'
        let bad = "0x5aaeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        match parse_checksummed(bad) {
            Err(CryptoError::InvalidChecksum { expected, got }) => {
                assert_eq!(expected, EIP55[0]);
                assert_eq!(got, bad);
            }
            other => panic!("Expected InvalidChecksum, got {:?}", other),
        }
        assert!(!is_valid_checksum(bad));
    }

    #[test]
    fn test_parse_checksummed_single_case_passes() {
        let lower = EIP55[0].to_lowercase();
        let upper = format!("0x{}", EIP55[0][2..].to_uppercase());
        assert!(!has_mixed_case(&lower));
        assert!(!has_mixed_case(&upper));
        assert_eq!(parse_checksummed(&lower).unwrap(), parse_checksummed(&upper).unwrap());
    }

    #[test]
    fn test_parse_checksummed_length_error() {
        assert_eq!(
            parse_checksummed("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeA"),
            Err(CryptoError::Address(AddressError::InvalidLength(19)))
        );
    }

    #[test]
    fn test_has_mixed_case_ignores_prefix() {
        assert!(!has_mixed_case("0Xabcdef"));
        assert!(has_mixed_case("0xAbcdef"));
    }
}
