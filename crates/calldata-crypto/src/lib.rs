//! # calldata-crypto
//!
//! Hashing primitives needed to build calldata.
//!
//! - Keccak-256 hashing (selectors)
//! - EIP-55 mixed-case address checksums

#![warn(missing_docs)]
#![warn(clippy::all)]

mod checksum;
mod error;
mod hash;

pub use checksum::{has_mixed_case, is_valid_checksum, parse_checksummed, to_checksum};
pub use error::CryptoError;
pub use hash::keccak256;
