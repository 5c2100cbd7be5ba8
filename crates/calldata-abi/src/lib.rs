//! # calldata-abi
//!
//! Ethereum ABI encoding and decoding for function calls and constructor
//! arguments.
//!
//! This crate provides:
//! - Signature parsing and selector computation
//! - Head/tail encoding of typed arguments into calldata
//! - Decoding calldata back into typed arguments
//! - Parsing argument text (addresses, amounts with units, nested lists)
//!
//! # Example
//!
//! ```rust
//! use calldata_abi::{encode, parse_args, ParseOptions, Signature};
//!
//! let sig = Signature::parse("mint(address,uint256)").unwrap();
//! let args = parse_args(
//!     &sig,
//!     &["0x4E9Ff90564C9D6B89d63197A0034c09A50e53190", "2000000000 ether"],
//!     &ParseOptions::default(),
//! )
//! .unwrap();
//! let calldata = encode(&sig, &args).unwrap();
//! assert!(calldata.to_hex().starts_with("0x40c10f19"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod decode;
mod encode;
mod error;
mod parse;
mod signature;
mod types;
pub mod units;

pub use decode::{decode, decode_params};
pub use encode::{encode, encode_constructor, encode_params, Calldata};
pub use error::AbiError;
pub use parse::{parse_args, parse_token, parse_token_with, ParseOptions};
pub use signature::{function_selector, Param, Signature};
pub use types::{I256, ParamType, Token};

// Re-export primitives for convenience
pub use calldata_primitives::{Address, U256};
