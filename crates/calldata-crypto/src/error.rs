//! Crypto error types

use calldata_primitives::AddressError;
use thiserror::Error;

/// Crypto error type
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Address could not be parsed at the byte level
    #[error("{0}")]
    Address(#[from] AddressError),

    /// Mixed-case address whose casing does not match its EIP-55 checksum
    #[error("bad address checksum: got {got}, expected {expected}")]
    InvalidChecksum {
        /// Checksummed rendering of the parsed bytes
        expected: String,
        /// Input as supplied
        got: String,
    },
}
