//! CLI configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use calldata_abi::units::{check_decimals, ETHER_DECIMALS};
use calldata_abi::ParseOptions;

use crate::CliError;

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Decimals used by `units` when no unit is given
    #[serde(default = "default_decimals")]
    pub decimals: u32,
    /// Require valid EIP-55 casing on mixed-case addresses
    #[serde(default = "default_strict_checksum")]
    pub strict_checksum: bool,
}

fn default_decimals() -> u32 {
    ETHER_DECIMALS
}

fn default_strict_checksum() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
            strict_checksum: default_strict_checksum(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".calldata"))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load config from `path` or the default location
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        match path.map(Path::to_path_buf).or_else(Self::config_path) {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
        check_decimals(config.decimals)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Check field ranges
    pub fn validate(&self) -> Result<(), CliError> {
        check_decimals(self.decimals).map_err(|e| CliError::Config(e.to_string()))
    }

    /// Save config to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<(), CliError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        tracing::debug!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Argument parsing options derived from this config
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            strict_checksum: self.strict_checksum,
        }
    }
}
