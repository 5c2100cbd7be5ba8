//! ABI decoding

use calldata_primitives::{Address, U256, WORD_LEN};

use crate::signature::Signature;
use crate::types::{I256, ParamType, Token};
use crate::AbiError;

/// Decode calldata produced for `signature`
///
/// For functions the leading four bytes must equal the selector; for
/// constructors the whole input is the argument block.
pub fn decode(signature: &Signature, data: &[u8]) -> Result<Vec<Token>, AbiError> {
    let block = match signature.selector() {
        Some(selector) => {
            check_length(data, 4)?;
            if data[..4] != selector {
                return Err(AbiError::SelectorMismatch {
                    expected: hex::encode(selector),
                    got: hex::encode(&data[..4]),
                });
            }
            &data[4..]
        }
        None => data,
    };

    let tokens = decode_params(&signature.types(), block)?;
    tracing::debug!(signature = %signature, params = tokens.len(), "decoded calldata");
    Ok(tokens)
}

/// Decode a head/tail argument block
pub fn decode_params(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    let mut offset = 0;
    let mut tokens = Vec::with_capacity(types.len());

    for param_type in types {
        let token = if param_type.is_dynamic() {
            let tail = read_offset(data, offset)?;
            decode_dynamic(param_type, &data[tail..])?
        } else {
            decode_static(param_type, data, offset)?
        };
        tokens.push(token);
        offset = offset.saturating_add(param_type.head_len());
    }

    Ok(tokens)
}

/// Decode a static type laid out inline at `offset`
fn decode_static(param_type: &ParamType, data: &[u8], offset: usize) -> Result<Token, AbiError> {
    match param_type {
        ParamType::Address => {
            let word = read_word(data, offset)?;
            if word[..12].iter().any(|b| *b != 0) {
                return Err(AbiError::Decode(format!(
                    "dirty address padding at offset {}",
                    offset
                )));
            }
            Ok(Token::Address(Address::from_slice(&word[12..])?))
        }
        ParamType::Uint(bits) => {
            let value = U256::from_big_endian(read_word(data, offset)?);
            if value.bits() > *bits {
                return Err(AbiError::Decode(format!(
                    "value at offset {} exceeds uint{}",
                    offset, bits
                )));
            }
            Ok(Token::Uint(value))
        }
        ParamType::Int(bits) => {
            let mut word = [0u8; WORD_LEN];
            word.copy_from_slice(read_word(data, offset)?);
            let value = I256::from_word(&word);
            if !value.fits(*bits) {
                return Err(AbiError::Decode(format!(
                    "value at offset {} exceeds int{}",
                    offset, bits
                )));
            }
            Ok(Token::Int(value))
        }
        ParamType::Bool => {
            let word = read_word(data, offset)?;
            if word[..31].iter().any(|b| *b != 0) || word[31] > 1 {
                return Err(AbiError::Decode(format!("invalid bool at offset {}", offset)));
            }
            Ok(Token::Bool(word[31] == 1))
        }
        ParamType::FixedBytes(size) => {
            let word = read_word(data, offset)?;
            if word[*size..].iter().any(|b| *b != 0) {
                return Err(AbiError::Decode(format!(
                    "dirty bytes{} padding at offset {}",
                    size, offset
                )));
            }
            Ok(Token::FixedBytes(word[..*size].to_vec()))
        }
        ParamType::FixedArray(inner, size) => {
            let body = slice_from(data, offset)?;
            check_elements(*size, inner, body)?;
            let inner_types = vec![(**inner).clone(); *size];
            Ok(Token::FixedArray(decode_params(&inner_types, body)?))
        }
        ParamType::Tuple(types) => Ok(Token::Tuple(decode_params(types, slice_from(data, offset)?)?)),
        ParamType::Bytes | ParamType::String | ParamType::Array(_) => Err(AbiError::Decode(format!(
            "{} is dynamic",
            param_type
        ))),
    }
}

/// Decode a dynamic type whose encoding starts at the beginning of `data`
fn decode_dynamic(param_type: &ParamType, data: &[u8]) -> Result<Token, AbiError> {
    match param_type {
        ParamType::Bytes => Ok(Token::Bytes(decode_bytes(data)?)),
        ParamType::String => {
            let s = String::from_utf8(decode_bytes(data)?)
                .map_err(|e| AbiError::Decode(format!("Invalid UTF-8: {}", e)))?;
            Ok(Token::String(s))
        }
        ParamType::Array(inner) => {
            let len = read_usize(data, 0)?;
            let body = &data[WORD_LEN..];
            check_elements(len, inner, body)?;
            let inner_types = vec![(**inner).clone(); len];
            Ok(Token::Array(decode_params(&inner_types, body)?))
        }
        ParamType::FixedArray(inner, size) => {
            check_elements(*size, inner, data)?;
            let inner_types = vec![(**inner).clone(); *size];
            Ok(Token::FixedArray(decode_params(&inner_types, data)?))
        }
        ParamType::Tuple(types) => Ok(Token::Tuple(decode_params(types, data)?)),
        _ => decode_static(param_type, data, 0),
    }
}

/// Decode dynamic bytes: length word, then payload
fn decode_bytes(data: &[u8]) -> Result<Vec<u8>, AbiError> {
    let len = read_usize(data, 0)?;
    let end = WORD_LEN
        .checked_add(len)
        .ok_or_else(|| AbiError::Decode(format!("byte length {} overflows", len)))?;
    check_length(data, end)?;
    Ok(data[WORD_LEN..end].to_vec())
}

/// Check `data` can hold `count` elements before allocating for them
///
/// Every element needs at least its head slot.
fn check_elements(count: usize, inner: &ParamType, data: &[u8]) -> Result<(), AbiError> {
    if count.saturating_mul(inner.head_len().max(1)) > data.len() {
        return Err(AbiError::Decode(format!(
            "array length {} exceeds available data",
            count
        )));
    }
    Ok(())
}

/// Read a head-slot offset and check it points inside `data`
fn read_offset(data: &[u8], at: usize) -> Result<usize, AbiError> {
    let offset = read_usize(data, at)?;
    if offset > data.len() {
        return Err(AbiError::Decode(format!(
            "offset {} out of range for {} bytes",
            offset,
            data.len()
        )));
    }
    Ok(offset)
}

fn read_usize(data: &[u8], at: usize) -> Result<usize, AbiError> {
    let value = U256::from_big_endian(read_word(data, at)?);
    if value > U256::from(u32::MAX) {
        return Err(AbiError::Decode(format!("length or offset {} too large", value)));
    }
    Ok(value.low_u64() as usize)
}

fn read_word(data: &[u8], at: usize) -> Result<&[u8], AbiError> {
    check_length(data, at.saturating_add(WORD_LEN))?;
    Ok(&data[at..at + WORD_LEN])
}

fn slice_from(data: &[u8], at: usize) -> Result<&[u8], AbiError> {
    check_length(data, at)?;
    Ok(&data[at..])
}

/// Check that data has at least `required` bytes
fn check_length(data: &[u8], required: usize) -> Result<(), AbiError> {
    if data.len() < required {
        return Err(AbiError::Decode(format!(
            "Insufficient data: need {} bytes, have {}",
            required,
            data.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_address() {
        let addr = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d").unwrap();
        let mut encoded = [0u8; 32];
        encoded[12..32].copy_from_slice(addr.as_bytes());

        let tokens = decode_params(&[ParamType::Address], &encoded).unwrap();
        assert_eq!(tokens, vec![Token::Address(addr)]);
    }

    #[test]
    fn test_decode_address_dirty_padding() {
        let mut encoded = [0u8; 32];
        encoded[0] = 1;
        assert!(decode_params(&[ParamType::Address], &encoded).is_err());
    }

    #[test]
    fn test_decode_uint_width() {
        let mut encoded = [0u8; 32];
        encoded[31] = 100;
        assert_eq!(
            decode_params(&[ParamType::Uint(256)], &encoded).unwrap(),
            vec![Token::Uint(U256::from(100))]
        );

        encoded[30] = 1;
        assert!(decode_params(&[ParamType::Uint(8)], &encoded).is_err());
    }

    #[test]
    fn test_decode_bool() {
        let mut encoded = [0u8; 32];
        encoded[31] = 1;
        assert_eq!(decode_params(&[ParamType::Bool], &encoded).unwrap(), vec![Token::Bool(true)]);

        encoded[31] = 2;
        assert!(decode_params(&[ParamType::Bool], &encoded).is_err());
    }

    #[test]
    fn test_decode_int_negative() {
        let encoded = [0xffu8; 32];
        let tokens = decode_params(&[ParamType::Int(8)], &encoded).unwrap();
        assert_eq!(tokens, vec![Token::Int(I256::from_i128(-1))]);
    }

    #[test]
    fn test_decode_dynamic_bytes() {
        let original = vec![0x01, 0x02, 0x03];

        let mut encoded = vec![0u8; 96];
        encoded[31] = 32;
        encoded[63] = 3;
        encoded[64..67].copy_from_slice(&original);

        let tokens = decode_params(&[ParamType::Bytes], &encoded).unwrap();
        assert_eq!(tokens, vec![Token::Bytes(original)]);
    }

    #[test]
    fn test_decode_string() {
        let mut encoded = vec![0u8; 96];
        encoded[31] = 32;
        encoded[63] = 5;
        encoded[64..69].copy_from_slice(b"hello");

        let tokens = decode_params(&[ParamType::String], &encoded).unwrap();
        assert_eq!(tokens, vec![Token::String("hello".to_string())]);
    }

    #[test]
    fn test_decode_insufficient_data() {
        assert!(decode_params(&[ParamType::Uint(256)], &[0u8; 16]).is_err());
    }

    #[test]
    fn test_decode_offset_out_of_range() {
        let mut encoded = vec![0u8; 64];
        encoded[31] = 0xff;
        let err = decode_params(&[ParamType::Bytes], &encoded).unwrap_err();
        assert!(matches!(err, AbiError::Decode(_)));
    }

    #[test]
    fn test_decode_huge_array_length() {
        let mut encoded = vec![0u8; 64];
        encoded[31] = 32;
        encoded[60] = 0xff;
        assert!(decode_params(&[ParamType::Array(Box::new(ParamType::Uint(256)))], &encoded).is_err());
    }

    #[test]
    fn test_decode_huge_fixed_array() {
        let huge = ParamType::FixedArray(Box::new(ParamType::Uint(256)), 2_000_000_000_000_000_000);
        assert!(matches!(decode_params(&[huge], &[0u8; 32]), Err(AbiError::Decode(_))));

        // dynamic elements take the tail path
        let huge_bytes = ParamType::FixedArray(Box::new(ParamType::Bytes), 100_000_000);
        let mut encoded = vec![0u8; 64];
        encoded[31] = 32;
        assert!(matches!(decode_params(&[huge_bytes], &encoded), Err(AbiError::Decode(_))));

        let sig = Signature::parse("f(uint256[2000000000000000000])").unwrap();
        let mut data = sig.selector().unwrap().to_vec();
        data.push(0);
        assert!(decode(&sig, &data).is_err());
    }

    #[test]
    fn test_decode_fixed_array_exact_fit() {
        let kind = ParamType::FixedArray(Box::new(ParamType::Uint(256)), 2);
        let mut encoded = [0u8; 64];
        encoded[31] = 1;
        encoded[63] = 2;
        assert_eq!(
            decode_params(&[kind.clone()], &encoded).unwrap(),
            vec![Token::FixedArray(vec![Token::Uint(U256::from(1)), Token::Uint(U256::from(2))])]
        );
        assert!(decode_params(&[kind], &encoded[..63]).is_err());
    }

    #[test]
    fn test_decode_selector_mismatch() {
        let sig = Signature::parse("mint(address,uint256)").unwrap();
        let mut data = vec![0u8; 68];
        data[..4].copy_from_slice(&[0xa9, 0x05, 0x9c, 0xbb]);
        match decode(&sig, &data) {
            Err(AbiError::SelectorMismatch { expected, got }) => {
                assert_eq!(expected, "40c10f19");
                assert_eq!(got, "a9059cbb");
            }
            other => panic!("Expected SelectorMismatch, got {:?}", other),
        }
        assert!(decode(&sig, &[0x40, 0xc1]).is_err());
    }
}
