//! # calldata-primitives
//!
//! Fixed-size value types used by the ABI encoder and the CLI.
//!
//! `Address` and `H256` are thin wrappers over byte arrays with hex
//! parsing and rendering; `U256` is re-exported from `primitive-types`.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod hash;

pub use address::{Address, AddressError};
pub use hash::{H256, HashError};

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Size of one ABI word in bytes
pub const WORD_LEN: usize = 32;

/// Strip an optional `0x`/`0X` prefix from a hex string
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}
