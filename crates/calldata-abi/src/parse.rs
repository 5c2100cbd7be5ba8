//! Argument text to typed tokens
//!
//! This is the caller-facing layer: it turns command-line or plan-file
//! strings into [`Token`]s and performs the validation the pure encoder
//! cannot, such as EIP-55 checksum checks on mixed-case addresses.

use calldata_primitives::{strip_hex_prefix, Address, U256};

use crate::signature::Signature;
use crate::types::{split_top_level, I256, ParamType, Token};
use crate::units::{parse_decimal, parse_units, unit_decimals};
use crate::AbiError;

/// Validation switches for argument parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject mixed-case addresses whose casing fails EIP-55
    pub strict_checksum: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict_checksum: true,
        }
    }
}

/// Parse one argument against its declared type with default options
pub fn parse_token(kind: &ParamType, input: &str) -> Result<Token, AbiError> {
    parse_token_with(kind, input, &ParseOptions::default())
}

/// Parse every argument of a signature
pub fn parse_args<S: AsRef<str>>(
    signature: &Signature,
    args: &[S],
    options: &ParseOptions,
) -> Result<Vec<Token>, AbiError> {
    let params = signature.params();
    if params.len() != args.len() {
        return Err(AbiError::ArityMismatch {
            expected: params.len(),
            got: args.len(),
        });
    }
    params
        .iter()
        .zip(args)
        .map(|(param, arg)| parse_token_with(&param.kind, arg.as_ref(), options))
        .collect()
}

/// Parse one argument against its declared type
pub fn parse_token_with(kind: &ParamType, input: &str, options: &ParseOptions) -> Result<Token, AbiError> {
    let input = input.trim();
    match kind {
        ParamType::Address => parse_address(input, options).map(Token::Address),
        ParamType::Uint(bits) => {
            if input.starts_with('-') {
                return Err(AbiError::IntegerOverflow(format!(
                    "negative value {} for uint{}",
                    input, bits
                )));
            }
            let value = parse_magnitude(input)?;
            if value.bits() > *bits {
                return Err(AbiError::IntegerOverflow(format!(
                    "{} does not fit in uint{}",
                    input, bits
                )));
            }
            Ok(Token::Uint(value))
        }
        ParamType::Int(bits) => {
            let (negative, digits) = match input.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, input),
            };
            let value = I256::new(parse_magnitude(digits)?, negative);
            if !value.fits(*bits) {
                return Err(AbiError::IntegerOverflow(format!(
                    "{} does not fit in int{}",
                    input, bits
                )));
            }
            Ok(Token::Int(value))
        }
        ParamType::Bool => match input {
            "true" => Ok(Token::Bool(true)),
            "false" => Ok(Token::Bool(false)),
            _ => Err(invalid(kind, format!("expected true or false, got '{}'", input))),
        },
        ParamType::Bytes => Ok(Token::Bytes(parse_hex(input)?)),
        ParamType::FixedBytes(size) => {
            let data = parse_hex(input)?;
            if data.len() != *size {
                return Err(invalid(kind, format!("expected {} bytes, got {}", size, data.len())));
            }
            Ok(Token::FixedBytes(data))
        }
        ParamType::String => Ok(Token::String(unquote(input))),
        ParamType::Array(inner) => {
            let items = list_items(kind, input, '[', ']')?;
            let tokens = items
                .iter()
                .map(|item| parse_token_with(inner, item, options))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Token::Array(tokens))
        }
        ParamType::FixedArray(inner, size) => {
            let items = list_items(kind, input, '[', ']')?;
            if items.len() != *size {
                return Err(AbiError::ArrayLengthMismatch {
                    expected: *size,
                    got: items.len(),
                });
            }
            let tokens = items
                .iter()
                .map(|item| parse_token_with(inner, item, options))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Token::FixedArray(tokens))
        }
        ParamType::Tuple(types) => {
            let items = list_items(kind, input, '(', ')')?;
            if items.len() != types.len() {
                return Err(AbiError::ArityMismatch {
                    expected: types.len(),
                    got: items.len(),
                });
            }
            let tokens = types
                .iter()
                .zip(&items)
                .map(|(t, item)| parse_token_with(t, item, options))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Token::Tuple(tokens))
        }
    }
}

fn parse_address(input: &str, options: &ParseOptions) -> Result<Address, AbiError> {
    if options.strict_checksum {
        Ok(calldata_crypto::parse_checksummed(input)?)
    } else {
        Ok(Address::from_hex(input)?)
    }
}

/// Integer magnitude: decimal, `0x` hex, or a decimal amount with a unit
/// suffix (`2000000000 ether`, `1.5 gwei`, `12.34 units:6`)
fn parse_magnitude(input: &str) -> Result<U256, AbiError> {
    let mut words = input.split_whitespace();
    let (number, unit) = match (words.next(), words.next(), words.next()) {
        (Some(number), None, None) => (number, None),
        (Some(number), Some(unit), None) => (number, Some(unit)),
        _ => return Err(AbiError::InvalidAmount(format!("cannot read '{}' as an integer", input))),
    };

    if let Some(unit) = unit {
        return parse_units(number, unit_decimals(unit)?);
    }

    if let Some(hex_digits) = number.strip_prefix("0x").or_else(|| number.strip_prefix("0X")) {
        if hex_digits.is_empty() {
            return Err(AbiError::InvalidAmount(format!("'{}' has no hex digits", number)));
        }
        let significant = hex_digits.trim_start_matches('0');
        if significant.len() > 64 {
            return Err(AbiError::IntegerOverflow(format!("{} exceeds 256 bits", number)));
        }
        if significant.is_empty() {
            return Ok(U256::zero());
        }
        return U256::from_str_radix(significant, 16)
            .map_err(|_| AbiError::InvalidAmount(format!("'{}' is not a hex integer", number)));
    }

    let digits: String = number.chars().filter(|c| *c != '_').collect();
    parse_decimal(&digits)
}

fn parse_hex(input: &str) -> Result<Vec<u8>, AbiError> {
    Ok(hex::decode(strip_hex_prefix(input))?)
}

/// Strip one pair of surrounding double quotes and undo `\"` / `\\` escapes
fn unquote(input: &str) -> String {
    match input.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) => {
            let mut out = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(c) = chars.next() {
                if c == '\\' {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                } else {
                    out.push(c);
                }
            }
            out
        }
        None => input.to_string(),
    }
}

fn list_items<'a>(kind: &ParamType, input: &'a str, open: char, close: char) -> Result<Vec<&'a str>, AbiError> {
    let body = input
        .strip_prefix(open)
        .and_then(|s| s.strip_suffix(close))
        .ok_or_else(|| invalid(kind, format!("expected {}...{}, got '{}'", open, close, input)))?;
    split_top_level(body).ok_or_else(|| invalid(kind, format!("unbalanced brackets in '{}'", input)))
}

fn invalid(kind: &ParamType, reason: String) -> AbiError {
    AbiError::InvalidArgument {
        kind: kind.to_string(),
        reason,
    }
}
