//! ABI type definitions

use std::fmt;
use std::str::FromStr;

use calldata_primitives::{Address, U256};

use crate::AbiError;

/// Solidity ABI token types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Address (20 bytes)
    Address(Address),
    /// Unsigned integer (8-256 bits)
    Uint(U256),
    /// Signed integer (8-256 bits)
    Int(I256),
    /// Boolean
    Bool(bool),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// Fixed-size bytes (1-32)
    FixedBytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Dynamic array
    Array(Vec<Token>),
    /// Fixed-size array
    FixedArray(Vec<Token>),
    /// Tuple (struct)
    Tuple(Vec<Token>),
}

/// Signed 256-bit integer as sign and magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct I256 {
    abs: U256,
    negative: bool,
}

impl I256 {
    /// Create from magnitude and sign; negative zero becomes zero
    pub fn new(abs: U256, negative: bool) -> Self {
        Self {
            abs,
            negative: negative && !abs.is_zero(),
        }
    }

    /// Create from i128
    pub fn from_i128(value: i128) -> Self {
        Self::new(U256::from(value.unsigned_abs()), value < 0)
    }

    /// Magnitude
    pub fn abs(&self) -> U256 {
        self.abs
    }

    /// Whether the value is below zero
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }

    /// Whether the value fits in a signed integer of `bits` width
    pub fn fits(&self, bits: usize) -> bool {
        let limit = U256::one() << (bits - 1);
        if self.negative {
            self.abs <= limit
        } else {
            self.abs < limit
        }
    }

    /// 32-byte two's complement word
    pub fn to_word(&self) -> [u8; 32] {
        let value = if self.negative {
            (!self.abs).overflowing_add(U256::one()).0
        } else {
            self.abs
        };
        let mut word = [0u8; 32];
        value.to_big_endian(&mut word);
        word
    }

    /// Read a 32-byte two's complement word
    pub fn from_word(word: &[u8; 32]) -> Self {
        let raw = U256::from_big_endian(word);
        if word[0] & 0x80 != 0 {
            Self::new((!raw).overflowing_add(U256::one()).0, true)
        } else {
            Self::new(raw, false)
        }
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.abs)
        } else {
            write!(f, "{}", self.abs)
        }
    }
}

/// Solidity parameter types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// Address
    Address,
    /// Unsigned integer with bit size (8, 16, ..., 256)
    Uint(usize),
    /// Signed integer with bit size
    Int(usize),
    /// Boolean
    Bool,
    /// Dynamic bytes
    Bytes,
    /// Fixed-size bytes (size 1-32)
    FixedBytes(usize),
    /// UTF-8 string
    String,
    /// Dynamic array
    Array(Box<ParamType>),
    /// Fixed-size array
    FixedArray(Box<ParamType>, usize),
    /// Tuple
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Check if this type is dynamic (variable length)
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            ParamType::Tuple(types) => types.iter().any(|t| t.is_dynamic()),
            _ => false,
        }
    }

    /// Bytes this type occupies in the head block
    ///
    /// Dynamic types take a single offset word; static composites are laid
    /// out inline. Saturates at `usize::MAX` for absurd array sizes.
    pub fn head_len(&self) -> usize {
        if self.is_dynamic() {
            return 32;
        }
        match self {
            ParamType::FixedArray(inner, size) => inner.head_len().saturating_mul(*size),
            ParamType::Tuple(types) => types
                .iter()
                .fold(0usize, |acc, t| acc.saturating_add(t.head_len())),
            _ => 32,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => write!(f, "address"),
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Int(bits) => write!(f, "int{}", bits),
            ParamType::Bool => write!(f, "bool"),
            ParamType::Bytes => write!(f, "bytes"),
            ParamType::FixedBytes(size) => write!(f, "bytes{}", size),
            ParamType::String => write!(f, "string"),
            ParamType::Array(inner) => write!(f, "{}[]", inner),
            ParamType::FixedArray(inner, size) => write!(f, "{}[{}]", inner, size),
            ParamType::Tuple(types) => {
                write!(f, "(")?;
                for (i, t) in types.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", t)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl FromStr for ParamType {
    type Err = AbiError;

    /// Parse a bare type expression such as `uint256`, `address[3]` or
    /// `(address,bytes)[]`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_param(s)? {
            (kind, None) => Ok(kind),
            (_, Some(name)) => Err(AbiError::UnknownType(format!(
                "{} (unexpected name '{}')",
                s.trim(),
                name
            ))),
        }
    }
}

/// Parse a parameter declaration: a type expression optionally followed by a
/// data-location keyword and a name (`bytes memory data`)
pub(crate) fn parse_param(s: &str) -> Result<(ParamType, Option<String>), AbiError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(AbiError::InvalidSignature("empty parameter".to_string()));
    }
    let s = match s.strip_prefix("tuple") {
        Some(rest) if rest.starts_with('(') => rest,
        _ => s,
    };

    let type_end = type_expr_end(s)?;
    let (type_str, rest) = s.split_at(type_end);

    let mut words = rest
        .split_whitespace()
        .filter(|w| !matches!(*w, "memory" | "calldata" | "storage" | "indexed"));
    let name = words.next().map(str::to_string);
    if let Some(extra) = words.next() {
        return Err(AbiError::InvalidSignature(format!(
            "unexpected '{}' in parameter '{}'",
            extra, s
        )));
    }

    Ok((parse_type_expr(type_str)?, name))
}

/// Byte index where the type expression of a declaration ends
fn type_expr_end(s: &str) -> Result<usize, AbiError> {
    let bytes = s.as_bytes();
    let mut end = if bytes[0] == b'(' {
        let mut depth = 0usize;
        let mut close = None;
        for (i, b) in bytes.iter().enumerate() {
            match b {
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }
        close.ok_or_else(|| AbiError::InvalidSignature(format!("unbalanced parentheses in '{}'", s)))? + 1
    } else {
        s.find(|c: char| c.is_whitespace() || c == '[').unwrap_or(s.len())
    };

    // Array suffixes
    while end < bytes.len() && bytes[end] == b'[' {
        let close = s[end..]
            .find(']')
            .ok_or_else(|| AbiError::InvalidSignature(format!("unclosed '[' in '{}'", s)))?;
        end += close + 1;
    }
    Ok(end)
}

fn parse_type_expr(s: &str) -> Result<ParamType, AbiError> {
    if let Some(body) = s.strip_suffix(']') {
        let open = body
            .rfind('[')
            .ok_or_else(|| AbiError::UnknownType(s.to_string()))?;
        let inner = Box::new(parse_type_expr(&body[..open])?);
        let dim = &body[open + 1..];
        if dim.is_empty() {
            return Ok(ParamType::Array(inner));
        }
        let size: usize = dim
            .parse()
            .map_err(|_| AbiError::UnknownType(format!("invalid array size in '{}'", s)))?;
        if size == 0 {
            return Err(AbiError::UnknownType(format!("zero-length array '{}'", s)));
        }
        return Ok(ParamType::FixedArray(inner, size));
    }

    if let Some(inner) = s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        let parts = split_top_level(inner)
            .ok_or_else(|| AbiError::InvalidSignature(format!("unbalanced tuple '{}'", s)))?;
        let types = parts
            .into_iter()
            .map(|p| parse_param(p).map(|(kind, _)| kind))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(ParamType::Tuple(types));
    }

    parse_elementary(s)
}

fn parse_elementary(s: &str) -> Result<ParamType, AbiError> {
    match s {
        "address" => return Ok(ParamType::Address),
        "bool" => return Ok(ParamType::Bool),
        "string" => return Ok(ParamType::String),
        "bytes" => return Ok(ParamType::Bytes),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("uint") {
        return int_width(s, rest).map(ParamType::Uint);
    }
    if let Some(rest) = s.strip_prefix("int") {
        return int_width(s, rest).map(ParamType::Int);
    }
    if let Some(rest) = s.strip_prefix("bytes") {
        let size: usize = rest
            .parse()
            .map_err(|_| AbiError::UnknownType(s.to_string()))?;
        if !(1..=32).contains(&size) {
            return Err(AbiError::UnknownType(format!("{} (size must be 1-32)", s)));
        }
        return Ok(ParamType::FixedBytes(size));
    }

    Err(AbiError::UnknownType(s.to_string()))
}

/// Width of `uint<N>`/`int<N>`; a bare `uint`/`int` means 256
fn int_width(full: &str, rest: &str) -> Result<usize, AbiError> {
    if rest.is_empty() {
        return Ok(256);
    }
    let bits: usize = rest
        .parse()
        .map_err(|_| AbiError::UnknownType(full.to_string()))?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(AbiError::UnknownType(format!(
            "{} (width must be a multiple of 8 up to 256)",
            full
        )));
    }
    Ok(bits)
}

/// Split on commas that are not nested inside brackets or quotes
///
/// Returns `None` when brackets or quotes are unbalanced. Blank input
/// yields no parts.
pub(crate) fn split_top_level(s: &str) -> Option<Vec<&str>> {
    if s.trim().is_empty() {
        return Some(Vec::new());
    }

    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        if in_quotes {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quotes = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            '(' | '[' => depth += 1,
            ')' | ']' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            ',' if depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    if depth != 0 || in_quotes {
        return None;
    }
    parts.push(s[start..].trim());
    Some(parts)
}

impl Token {
    /// Short description of the value kind, used in error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Address(_) => "address".to_string(),
            Token::Uint(_) => "uint".to_string(),
            Token::Int(_) => "int".to_string(),
            Token::Bool(_) => "bool".to_string(),
            Token::Bytes(_) => "bytes".to_string(),
            Token::FixedBytes(b) => format!("bytes{}", b.len()),
            Token::String(_) => "string".to_string(),
            Token::Array(items) => format!("array of {}", items.len()),
            Token::FixedArray(items) => format!("fixed array of {}", items.len()),
            Token::Tuple(items) => format!("tuple of {}", items.len()),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, open: &str, close: &str, items: &[Token]) -> fmt::Result {
            write!(f, "{}", open)?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", item)?;
            }
            write!(f, "{}", close)
        }

        match self {
            Token::Address(addr) => write!(f, "{}", calldata_crypto::to_checksum(addr)),
            Token::Uint(value) => write!(f, "{}", value),
            Token::Int(value) => write!(f, "{}", value),
            Token::Bool(value) => write!(f, "{}", value),
            Token::Bytes(data) | Token::FixedBytes(data) => write!(f, "0x{}", hex::encode(data)),
            Token::String(s) => write!(f, "{:?}", s),
            Token::Array(items) | Token::FixedArray(items) => list(f, "[", "]", items),
            Token::Tuple(items) => list(f, "(", ")", items),
        }
    }
}
