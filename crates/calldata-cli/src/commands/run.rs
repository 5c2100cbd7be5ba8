//! Plan execution command

use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use crate::{config::Config, output::Output, plan::Plan, CliError};

/// Encode every call in a plan file
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Plan file (TOML); the built-in token-wallet mints when omitted
    #[arg(long)]
    plan: Option<PathBuf>,
}

impl RunCommand {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let plan = match &self.plan {
            Some(path) => Plan::load(path)?,
            None => Plan::builtin(),
        };
        tracing::info!(calls = plan.calls.len(), "running plan");

        let outputs = plan.execute(&config.parse_options())?;

        let lines: Vec<String> = outputs
            .iter()
            .map(|o| format!("{}: {}", o.label, o.calldata))
            .collect();
        let calls = outputs
            .iter()
            .map(|o| {
                json!({
                    "label": o.label,
                    "signature": o.signature,
                    "calldata": o.calldata.to_hex(),
                })
            })
            .collect();

        Output::new(json)
            .field_value("calls", serde_json::Value::Array(calls))
            .message(&lines.join("\n"))
            .print();

        Ok(())
    }
}
