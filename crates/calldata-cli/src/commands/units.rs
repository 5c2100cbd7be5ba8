//! Unit conversion command

use calldata_abi::units::{format_units, parse_units, unit_decimals};
use calldata_abi::U256;
use clap::Args;

use crate::{config::Config, output::Output, CliError};

/// Scale a decimal amount to base units
#[derive(Debug, Args)]
pub struct UnitsCommand {
    /// Amount, e.g. "2000000000" or "0.5"
    amount: String,
    /// Decimal places (defaults to the configured value)
    #[arg(long, conflicts_with = "unit")]
    decimals: Option<u32>,
    /// Named unit: wei, gwei, ether
    #[arg(long)]
    unit: Option<String>,
    /// Treat the amount as base units and print the decimal amount
    #[arg(long)]
    reverse: bool,
}

impl UnitsCommand {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let decimals = match (&self.unit, self.decimals) {
            (Some(unit), _) => unit_decimals(unit)?,
            (None, Some(decimals)) => decimals,
            (None, None) => config.decimals,
        };

        if self.reverse {
            let value = U256::from_dec_str(self.amount.trim())
                .map_err(|e| CliError::InvalidInput(format!("'{}': {:?}", self.amount, e)))?;
            let amount = format_units(value, decimals)?;
            Output::new(json)
                .field("amount", &amount)
                .field_u64("decimals", u64::from(decimals))
                .message(&amount)
                .print();
            return Ok(());
        }

        let value = parse_units(&self.amount, decimals)?;
        Output::new(json)
            .field("value", &value.to_string())
            .field("hex", &format!("0x{:x}", value))
            .field_u64("decimals", u64::from(decimals))
            .message(&value.to_string())
            .print();

        Ok(())
    }
}
