//! Encode command

use calldata_abi::{encode, encode_constructor, parse_args, Signature};
use calldata_primitives::strip_hex_prefix;
use clap::Args;

use crate::{config::Config, output::Output, CliError};

/// Encode a function call or constructor arguments
#[derive(Debug, Args)]
pub struct EncodeCommand {
    /// Signature, e.g. "mint(address,uint256)" or "constructor(address,bytes)"
    signature: String,
    /// Arguments, one per parameter
    #[arg(allow_negative_numbers = true)]
    args: Vec<String>,
    /// Init code (hex) to prepend to constructor arguments
    #[arg(long)]
    bytecode: Option<String>,
}

impl EncodeCommand {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let signature = Signature::parse(&self.signature)?;
        let tokens = parse_args(&signature, &self.args, &config.parse_options())?;

        let calldata = match &self.bytecode {
            Some(code) => {
                let code = hex::decode(strip_hex_prefix(code.trim()))
                    .map_err(|e| CliError::InvalidHex(e.to_string()))?;
                encode_constructor(&code, &signature, &tokens)?
            }
            None => encode(&signature, &tokens)?,
        };

        let mut output = Output::new(json)
            .field("signature", &signature.canonical())
            .field("calldata", &calldata.to_hex())
            .field_u64("length", calldata.len() as u64)
            .message(&calldata.to_hex());
        if let Some(selector) = signature.selector() {
            output = output.field("selector", &format!("0x{}", hex::encode(selector)));
        }
        output.print();

        Ok(())
    }
}
