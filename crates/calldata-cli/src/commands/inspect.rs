//! Selector and checksum commands

use calldata_abi::Signature;
use calldata_crypto::{has_mixed_case, is_valid_checksum, to_checksum};
use calldata_primitives::Address;
use clap::Args;

use crate::{output::Output, CliError};

/// Print the canonical signature and its selector
#[derive(Debug, Args)]
pub struct SelectorCommand {
    /// Function signature
    signature: String,
}

impl SelectorCommand {
    pub fn execute(self, json: bool) -> Result<(), CliError> {
        let signature = Signature::parse(&self.signature)?;
        let selector = signature.selector().ok_or_else(|| {
            CliError::InvalidInput(format!("'{}' is a constructor and has no selector", signature))
        })?;
        let selector = format!("0x{}", hex::encode(selector));

        Output::new(json)
            .field("signature", &signature.canonical())
            .field("selector", &selector)
            .message(&format!("{} {}", selector, signature.canonical()))
            .print();

        Ok(())
    }
}

/// Print the EIP-55 rendering of an address
#[derive(Debug, Args)]
pub struct ChecksumCommand {
    /// Address (hex, any case)
    address: String,
}

impl ChecksumCommand {
    pub fn execute(self, json: bool) -> Result<(), CliError> {
        let address = Address::from_hex(&self.address)
            .map_err(|e| CliError::InvalidAddress(e.to_string()))?;
        let checksum = to_checksum(&address);

        // Only mixed-case input carries a checksum to verify
        let input = self.address.trim();
        if has_mixed_case(input) && !is_valid_checksum(input) {
            tracing::warn!(input, expected = %checksum, "input casing fails EIP-55");
        }

        Output::new(json)
            .field("address", &checksum)
            .field_value("input_checksum_valid", serde_json::Value::Bool(is_valid_checksum(input)))
            .message(&checksum)
            .print();

        Ok(())
    }
}
