//! ABI encoding

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use calldata_primitives::{strip_hex_prefix, U256, WORD_LEN};

use crate::signature::Signature;
use crate::types::{ParamType, Token};
use crate::AbiError;

/// Encoded call payload
///
/// Renders as lowercase hex with a `0x` prefix.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Calldata(Bytes);

impl Calldata {
    /// Wrap raw bytes
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self(data.into())
    }

    /// Parse from hex (with or without 0x prefix)
    pub fn from_hex(s: &str) -> Result<Self, AbiError> {
        Ok(Self(hex::decode(strip_hex_prefix(s.trim()))?.into()))
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the underlying buffer
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hex with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }
}

impl fmt::Display for Calldata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Calldata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Calldata({})", self.to_hex())
    }
}

impl FromStr for Calldata {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Calldata::from_hex(s)
    }
}

impl AsRef<[u8]> for Calldata {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Calldata {
    fn from(data: Vec<u8>) -> Self {
        Self(data.into())
    }
}

/// Encode a call: selector (functions only) followed by the argument block
pub fn encode(signature: &Signature, tokens: &[Token]) -> Result<Calldata, AbiError> {
    let block = encode_params(&signature.types(), tokens)?;

    let mut out = Vec::with_capacity(4 + block.len());
    if let Some(selector) = signature.selector() {
        out.extend_from_slice(&selector);
    }
    out.extend(block);

    tracing::debug!(signature = %signature, len = out.len(), "encoded calldata");
    Ok(Calldata::from(out))
}

/// Encode a deployment payload: init code followed by constructor arguments
///
/// With empty `bytecode` this is just the constructor argument block. A
/// named signature is rejected, since a function selector has no place in
/// deployment data.
pub fn encode_constructor(
    bytecode: &[u8],
    signature: &Signature,
    tokens: &[Token],
) -> Result<Calldata, AbiError> {
    if !signature.is_constructor() {
        return Err(AbiError::InvalidSignature(format!(
            "'{}' is not a constructor signature",
            signature
        )));
    }
    let block = encode_params(&signature.types(), tokens)?;

    let mut out = Vec::with_capacity(bytecode.len() + block.len());
    out.extend_from_slice(bytecode);
    out.extend(block);

    tracing::debug!(
        signature = %signature,
        init_code = bytecode.len(),
        len = out.len(),
        "encoded constructor payload"
    );
    Ok(Calldata::from(out))
}

/// Encode parameters into a head/tail block
pub fn encode_params(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
    if types.len() != tokens.len() {
        return Err(AbiError::ArityMismatch {
            expected: types.len(),
            got: tokens.len(),
        });
    }

    // Encode every token first so shapes are validated before sizing
    let encoded = types
        .iter()
        .zip(tokens)
        .map(|(param_type, token)| Ok((param_type.is_dynamic(), encode_token(param_type, token)?)))
        .collect::<Result<Vec<_>, AbiError>>()?;

    // Head size (fixed part)
    let head_size = encoded
        .iter()
        .map(|(dynamic, bytes)| if *dynamic { WORD_LEN } else { bytes.len() })
        .sum::<usize>();

    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for (dynamic, bytes) in encoded {
        if dynamic {
            // Offset is relative to the start of this block
            head.extend_from_slice(&usize_word(head_size + tail.len()));
            tail.extend(bytes);
        } else {
            head.extend(bytes);
        }
    }

    head.extend(tail);
    Ok(head)
}

/// Encode a single token against its declared type
fn encode_token(param_type: &ParamType, token: &Token) -> Result<Vec<u8>, AbiError> {
    match (param_type, token) {
        (ParamType::Address, Token::Address(addr)) => {
            let mut buf = [0u8; WORD_LEN];
            buf[12..].copy_from_slice(addr.as_bytes());
            Ok(buf.to_vec())
        }
        (ParamType::Uint(bits), Token::Uint(value)) => {
            if value.bits() > *bits {
                return Err(AbiError::IntegerOverflow(format!(
                    "{} does not fit in uint{}",
                    value, bits
                )));
            }
            Ok(u256_word(value).to_vec())
        }
        (ParamType::Int(bits), Token::Int(value)) => {
            if !value.fits(*bits) {
                return Err(AbiError::IntegerOverflow(format!(
                    "{} does not fit in int{}",
                    value, bits
                )));
            }
            Ok(value.to_word().to_vec())
        }
        (ParamType::Bool, Token::Bool(b)) => {
            let mut buf = [0u8; WORD_LEN];
            buf[31] = u8::from(*b);
            Ok(buf.to_vec())
        }
        (ParamType::FixedBytes(size), Token::FixedBytes(data)) => {
            if data.len() != *size {
                return Err(AbiError::TypeMismatch {
                    expected: param_type.to_string(),
                    got: token.describe(),
                });
            }
            let mut buf = [0u8; WORD_LEN];
            buf[..data.len()].copy_from_slice(data);
            Ok(buf.to_vec())
        }
        (ParamType::Bytes, Token::Bytes(data)) => Ok(encode_bytes(data)),
        (ParamType::String, Token::String(s)) => Ok(encode_bytes(s.as_bytes())),
        (ParamType::Array(inner), Token::Array(tokens)) => {
            let mut result = usize_word(tokens.len()).to_vec();
            let inner_types = vec![(**inner).clone(); tokens.len()];
            result.extend(encode_params(&inner_types, tokens)?);
            Ok(result)
        }
        (ParamType::FixedArray(inner, size), Token::FixedArray(tokens)) => {
            if tokens.len() != *size {
                return Err(AbiError::ArrayLengthMismatch {
                    expected: *size,
                    got: tokens.len(),
                });
            }
            let inner_types = vec![(**inner).clone(); *size];
            encode_params(&inner_types, tokens)
        }
        (ParamType::Tuple(types), Token::Tuple(tokens)) => encode_params(types, tokens),
        (expected, got) => Err(AbiError::TypeMismatch {
            expected: expected.to_string(),
            got: got.describe(),
        }),
    }
}

/// Convert U256 to 32-byte big-endian array
pub(crate) fn u256_word(value: &U256) -> [u8; WORD_LEN] {
    let mut bytes = [0u8; WORD_LEN];
    value.to_big_endian(&mut bytes);
    bytes
}

fn usize_word(value: usize) -> [u8; WORD_LEN] {
    u256_word(&U256::from(value))
}

/// Length word, payload, zero padding to a word boundary
fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let padded_len = data.len().div_ceil(WORD_LEN) * WORD_LEN;
    let mut result = Vec::with_capacity(WORD_LEN + padded_len);
    result.extend_from_slice(&usize_word(data.len()));
    result.extend_from_slice(data);
    result.resize(WORD_LEN + padded_len, 0);
    result
}
