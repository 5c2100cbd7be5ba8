//! Batch plans
//!
//! A plan is an ordered list of labelled encode requests, read from TOML:
//!
//! ```toml
//! [[call]]
//! label = "init"
//! signature = "initialize(address owner)"
//! args = ["0x4E9Ff90564C9D6B89d63197A0034c09A50e53190"]
//!
//! [[call]]
//! label = "proxy"
//! signature = "constructor(address logic, address admin, bytes data)"
//! args = ["0x...", "0x...", "@init"]
//! ```
//!
//! A `bytes` argument written as `@label` takes the calldata produced by an
//! earlier call with that label.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use calldata_abi::{encode, encode_constructor, parse_args, Calldata, ParamType, ParseOptions, Signature};
use serde::{Deserialize, Serialize};

use crate::CliError;

const TOKEN_WALLETS: [&str; 3] = [
    "0x4E9Ff90564C9D6B89d63197A0034c09A50e53190",
    "0x08D8B7852a03e775BE9C0D2137A59E417A4B3e5B",
    "0x062f6869e5FC2f56f52a817eAd98c1d6576412F4",
];

const TOKEN_WALLET_MINT: &str = "2000000000 ether";

/// Ordered list of calls
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Plan {
    /// Calls in execution order
    #[serde(default, rename = "call")]
    pub calls: Vec<PlanCall>,
}

/// One labelled encode request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanCall {
    /// Name later calls use to reference this output
    pub label: String,
    /// Function or constructor signature
    pub signature: String,
    /// Argument texts, one per parameter
    #[serde(default)]
    pub args: Vec<String>,
    /// Init code prepended to constructor arguments
    #[serde(default)]
    pub bytecode: Option<String>,
}

/// Calldata produced by one plan call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOutput {
    /// Label of the call
    pub label: String,
    /// Canonical signature
    pub signature: String,
    /// Encoded bytes
    pub calldata: Calldata,
}

impl Plan {
    /// Mint 2,000,000,000 tokens (18 decimals) to each token wallet
    pub fn builtin() -> Self {
        let calls = TOKEN_WALLETS
            .iter()
            .enumerate()
            .map(|(i, wallet)| PlanCall {
                label: format!("token-wallet-{}", i + 1),
                signature: "mint(address,uint256)".to_string(),
                args: vec![wallet.to_string(), TOKEN_WALLET_MINT.to_string()],
                bytecode: None,
            })
            .collect();
        Self { calls }
    }

    /// Read a plan file
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| with_context(&path.display().to_string(), e))
    }

    /// Parse plan TOML
    pub fn parse(content: &str) -> Result<Self, CliError> {
        let plan: Plan = toml::from_str(content).map_err(|e| CliError::Plan(e.to_string()))?;
        plan.validate()?;
        Ok(plan)
    }

    /// Check labels are present and unique
    pub fn validate(&self) -> Result<(), CliError> {
        if self.calls.is_empty() {
            return Err(CliError::Plan("plan has no calls".to_string()));
        }
        let mut seen = HashSet::new();
        for call in &self.calls {
            if call.label.trim().is_empty() {
                return Err(CliError::Plan(format!("call '{}' has an empty label", call.signature)));
            }
            if !seen.insert(call.label.as_str()) {
                return Err(CliError::Plan(format!("duplicate label '{}'", call.label)));
            }
        }
        Ok(())
    }

    /// Encode every call in order
    ///
    /// Stops at the first failing call; no partial results are returned.
    pub fn execute(&self, options: &ParseOptions) -> Result<Vec<PlanOutput>, CliError> {
        self.validate()?;

        let mut produced: HashMap<&str, Calldata> = HashMap::new();
        let mut outputs = Vec::with_capacity(self.calls.len());

        for call in &self.calls {
            let output = execute_call(call, &produced, options)
                .map_err(|e| with_context(&format!("call '{}'", call.label), e))?;
            tracing::debug!(label = %call.label, len = output.calldata.len(), "plan call encoded");
            produced.insert(call.label.as_str(), output.calldata.clone());
            outputs.push(output);
        }

        Ok(outputs)
    }
}

/// Prefix an error with where it happened, without nesting plan errors
fn with_context(context: &str, err: CliError) -> CliError {
    match err {
        CliError::Plan(msg) => CliError::Plan(format!("{}: {}", context, msg)),
        other => CliError::Plan(format!("{}: {}", context, other)),
    }
}

fn execute_call(
    call: &PlanCall,
    produced: &HashMap<&str, Calldata>,
    options: &ParseOptions,
) -> Result<PlanOutput, CliError> {
    let signature = Signature::parse(&call.signature)?;

    let args = call
        .args
        .iter()
        .enumerate()
        .map(|(i, arg)| resolve_reference(arg, signature.params().get(i).map(|p| &p.kind), produced))
        .collect::<Result<Vec<_>, _>>()?;
    let tokens = parse_args(&signature, &args, options)?;

    let calldata = match &call.bytecode {
        Some(code) => {
            let code = hex::decode(calldata_primitives::strip_hex_prefix(code.trim()))
                .map_err(|e| CliError::InvalidHex(e.to_string()))?;
            encode_constructor(&code, &signature, &tokens)?
        }
        None => encode(&signature, &tokens)?,
    };

    Ok(PlanOutput {
        label: call.label.clone(),
        signature: signature.canonical(),
        calldata,
    })
}

/// Substitute `@label` in a `bytes` argument with earlier calldata
fn resolve_reference(
    arg: &str,
    kind: Option<&ParamType>,
    produced: &HashMap<&str, Calldata>,
) -> Result<String, CliError> {
    match (kind, arg.trim().strip_prefix('@')) {
        (Some(ParamType::Bytes), Some(label)) => produced
            .get(label)
            .map(Calldata::to_hex)
            .ok_or_else(|| CliError::Plan(format!("unknown label '@{}'", label))),
        _ => Ok(arg.to_string()),
    }
}
