//! # calldata
//!
//! Command-line encoder for Ethereum function calls and contract deployments.
//!
//! ## Usage
//!
//! ```bash
//! # Encode a call
//! calldata encode "mint(address,uint256)" 0x4E9Ff90564C9D6B89d63197A0034c09A50e53190 "2000000000 ether"
//!
//! # Constructor arguments, optionally after init code
//! calldata encode "constructor(address,address,bytes)" 0x... 0x... 0x8129fc1c --bytecode 0x6080...
//!
//! # Inspect
//! calldata decode "mint(address,uint256)" 0x40c10f19...
//! calldata selector "transfer(address,uint256)"
//! calldata checksum 0x4e9ff90564c9d6b89d63197a0034c09a50e53190
//! calldata units 1.5 --unit gwei
//!
//! # Batch plans
//! calldata run
//! calldata run --plan demos/proxy_deploy.toml
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;
mod plan;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// Calldata encoder CLI
#[derive(Parser, Debug)]
#[command(name = "calldata")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Config file path (defaults to ~/.calldata/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Accept mixed-case addresses with a bad EIP-55 checksum
    #[arg(long, global = true)]
    no_strict_checksum: bool,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Encode a function call or constructor arguments
    Encode(commands::encode::EncodeCommand),
    /// Decode calldata against a signature
    Decode(commands::decode::DecodeCommand),
    /// Print a function selector
    Selector(commands::inspect::SelectorCommand),
    /// Print the EIP-55 checksum form of an address
    Checksum(commands::inspect::ChecksumCommand),
    /// Convert a decimal amount to base units
    Units(commands::units::UnitsCommand),
    /// Encode every call in a plan
    Run(commands::run::RunCommand),
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set default decimals for `units`
        #[arg(long)]
        set_decimals: Option<u32>,
        /// Set EIP-55 enforcement
        #[arg(long)]
        set_strict_checksum: Option<bool>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for results
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(e) = run(cli.command, cli.config, cli.no_strict_checksum, cli.json) {
        if cli.json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn run(
    command: Commands,
    config_path: Option<PathBuf>,
    no_strict_checksum: bool,
    json: bool,
) -> Result<(), CliError> {
    let mut config = Config::load(config_path.as_deref())?;

    // Flag overrides config for this run only; never saved
    let mut effective = config.clone();
    if no_strict_checksum {
        effective.strict_checksum = false;
    }

    match command {
        Commands::Encode(cmd) => cmd.execute(&effective, json),
        Commands::Decode(cmd) => cmd.execute(json),
        Commands::Selector(cmd) => cmd.execute(json),
        Commands::Checksum(cmd) => cmd.execute(json),
        Commands::Units(cmd) => cmd.execute(&effective, json),
        Commands::Run(cmd) => cmd.execute(&effective, json),
        Commands::Config {
            show,
            set_decimals,
            set_strict_checksum,
        } => handle_config(&mut config, config_path, show, set_decimals, set_strict_checksum, json),
    }
}

fn handle_config(
    config: &mut Config,
    path: Option<PathBuf>,
    show: bool,
    set_decimals: Option<u32>,
    set_strict_checksum: Option<bool>,
    json: bool,
) -> Result<(), CliError> {
    let mut modified = false;

    if let Some(decimals) = set_decimals {
        config.decimals = decimals;
        modified = true;
    }

    if let Some(strict) = set_strict_checksum {
        config.strict_checksum = strict;
        modified = true;
    }

    if modified {
        config.validate()?;
        let path = path
            .or_else(Config::config_path)
            .ok_or_else(|| CliError::Config("Cannot determine config path".to_string()))?;
        config.save_to(&path)?;
        Output::new(json)
            .field("status", "saved")
            .field("path", &path.display().to_string())
            .message("Configuration saved")
            .print();
    } else if show {
        Output::new(json)
            .field_u64("decimals", u64::from(config.decimals))
            .field_value("strict_checksum", serde_json::Value::Bool(config.strict_checksum))
            .message(&format!(
                "Decimals: {}\nStrict checksum: {}",
                config.decimals, config.strict_checksum
            ))
            .print();
    } else {
        Output::new(json)
            .message("Use --show to display config, or --set-decimals/--set-strict-checksum to modify")
            .print();
    }

    Ok(())
}
