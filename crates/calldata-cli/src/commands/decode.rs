//! Decode command

use calldata_abi::{decode, Calldata, Signature};
use clap::Args;
use serde_json::Value;

use crate::{output::token_to_json, output::Output, CliError};

/// Decode calldata against a signature
#[derive(Debug, Args)]
pub struct DecodeCommand {
    /// Signature the data was encoded for
    signature: String,
    /// Calldata (hex)
    data: String,
}

impl DecodeCommand {
    pub fn execute(self, json: bool) -> Result<(), CliError> {
        let signature = Signature::parse(&self.signature)?;
        let data = Calldata::from_hex(&self.data)?;
        let tokens = decode(&signature, data.as_bytes())?;

        let lines: Vec<String> = signature
            .params()
            .iter()
            .zip(&tokens)
            .map(|(param, token)| match &param.name {
                Some(name) => format!("{} {}: {}", param.kind, name, token),
                None => format!("{}: {}", param.kind, token),
            })
            .collect();

        Output::new(json)
            .field("signature", &signature.canonical())
            .field_value("values", Value::Array(tokens.iter().map(token_to_json).collect()))
            .message(&lines.join("\n"))
            .print();

        Ok(())
    }
}
