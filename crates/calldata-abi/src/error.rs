//! ABI error types

use calldata_crypto::CryptoError;
use thiserror::Error;

/// Error raised while building or reading calldata
///
/// Every variant is terminal for the call that produced it; no partial
/// output is ever returned alongside an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AbiError {
    /// Address is not 20 bytes of hex, or fails its checksum
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Integer is negative where unsigned, or does not fit the declared width
    #[error("Integer overflow: {0}")]
    IntegerOverflow(String),

    /// Argument count differs from parameter count
    #[error("Expected {expected} arguments, got {got}")]
    ArityMismatch {
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// Fixed-size array argument has the wrong number of elements
    #[error("Fixed array length mismatch: expected {expected} elements, got {got}")]
    ArrayLengthMismatch {
        /// Declared array size
        expected: usize,
        /// Supplied element count
        got: usize,
    },

    /// Token variant does not match the declared parameter type
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Declared type
        expected: String,
        /// Supplied value kind
        got: String,
    },

    /// Malformed function or constructor signature
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Unrecognised type name
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// Argument text that cannot be read as the declared type
    #[error("Invalid {kind} argument: {reason}")]
    InvalidArgument {
        /// Declared type
        kind: String,
        /// What went wrong
        reason: String,
    },

    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Malformed decimal amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Calldata does not start with the signature's selector
    #[error("Selector mismatch: expected 0x{expected}, got 0x{got}")]
    SelectorMismatch {
        /// Selector of the signature
        expected: String,
        /// Leading bytes of the data
        got: String,
    },

    /// Malformed encoded data
    #[error("ABI decoding error: {0}")]
    Decode(String),
}

impl From<hex::FromHexError> for AbiError {
    fn from(e: hex::FromHexError) -> Self {
        AbiError::InvalidHex(e.to_string())
    }
}

impl From<CryptoError> for AbiError {
    fn from(e: CryptoError) -> Self {
        AbiError::InvalidAddress(e.to_string())
    }
}

impl From<calldata_primitives::AddressError> for AbiError {
    fn from(e: calldata_primitives::AddressError) -> Self {
        AbiError::InvalidAddress(e.to_string())
    }
}
