//! Function and constructor signatures

use std::fmt;
use std::str::FromStr;

use crate::types::{parse_param, split_top_level, ParamType};
use crate::AbiError;

/// Compute function selector (first 4 bytes of keccak256(signature))
pub fn function_selector(signature: &str) -> [u8; 4] {
    calldata_crypto::keccak256(signature.as_bytes()).prefix4()
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name, if the declaration carried one
    pub name: Option<String>,
    /// Declared type
    pub kind: ParamType,
}

impl Param {
    /// Unnamed parameter
    pub fn new(kind: ParamType) -> Self {
        Self { name: None, kind }
    }

    /// Named parameter
    pub fn named(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            name: Some(name.into()),
            kind,
        }
    }
}

/// Ordered parameter list plus an optional function name
///
/// A signature without a name is a constructor: it has no selector and its
/// calldata is the bare argument block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    name: Option<String>,
    params: Vec<Param>,
}

impl Signature {
    /// Named function signature
    pub fn function(name: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            name: Some(name.into()),
            params,
        }
    }

    /// Constructor signature
    pub fn constructor(params: Vec<Param>) -> Self {
        Self { name: None, params }
    }

    /// Parse a human-readable signature
    ///
    /// Accepts `mint(address,uint256)`, `function mint(address to, uint256 amount)`,
    /// `constructor(address,address,bytes)` and bare `(address,bytes)`. Anything
    /// after the closing parenthesis (`external`, `returns (...)`) is ignored.
    pub fn parse(s: &str) -> Result<Self, AbiError> {
        let s = s.trim();
        let s = s.strip_prefix("function ").map(str::trim_start).unwrap_or(s);

        let open = s
            .find('(')
            .ok_or_else(|| AbiError::InvalidSignature(format!("missing '(' in '{}'", s)))?;
        let close = matching_paren(s, open)
            .ok_or_else(|| AbiError::InvalidSignature(format!("unbalanced parentheses in '{}'", s)))?;

        let trailer = &s[close + 1..];
        if !trailer.is_empty() && !trailer.starts_with(char::is_whitespace) {
            return Err(AbiError::InvalidSignature(format!(
                "unexpected '{}' after parameter list",
                trailer
            )));
        }

        let name = s[..open].trim();
        let name = match name {
            "" | "constructor" => None,
            _ if is_identifier(name) => Some(name.to_string()),
            _ => {
                return Err(AbiError::InvalidSignature(format!(
                    "invalid function name '{}'",
                    name
                )))
            }
        };

        let inner = &s[open + 1..close];
        let parts = split_top_level(inner)
            .ok_or_else(|| AbiError::InvalidSignature(format!("unbalanced parameter list '{}'", inner)))?;
        let params = parts
            .into_iter()
            .map(|part| parse_param(part).map(|(kind, name)| Param { name, kind }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { name, params })
    }

    /// Function name, `None` for constructors
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether this is a constructor signature
    pub fn is_constructor(&self) -> bool {
        self.name.is_none()
    }

    /// Declared parameters
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Declared parameter types, in order
    pub fn types(&self) -> Vec<ParamType> {
        self.params.iter().map(|p| p.kind.clone()).collect()
    }

    /// Canonical string: name and comma-joined type names, no spaces or names
    pub fn canonical(&self) -> String {
        let types: Vec<String> = self.params.iter().map(|p| p.kind.to_string()).collect();
        format!("{}({})", self.name.as_deref().unwrap_or("constructor"), types.join(","))
    }

    /// Four-byte selector; constructors have none
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.name.as_ref().map(|_| function_selector(&self.canonical()))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl FromStr for Signature {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Signature::parse(s)
    }
}

fn matching_paren(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
