//! Multi-network configuration for registry administration
//!
//! Resolves the network settings used when invoking the deployed artifact
//! registry. Values are resolved in priority order:
//!
//! 1. Environment variables (SOROBAN_*), with `.env` loaded first
//! 2. The selected profile in soroban.toml
//! 3. Built-in network defaults
//!
//! # Examples
//!
//! ```rust,no_run
//! use artifact_tools::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! println!("Network: {}", config.network);
//! println!("RPC URL: {}", config.rpc_url);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid network: {0}. Must be: testnet, mainnet, or sandbox")]
    InvalidNetwork(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

/// Stellar networks the registry tooling can talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Testnet,
    Mainnet,
    Sandbox,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
            Network::Sandbox => "sandbox",
        }
    }

    /// Default RPC endpoint for this network
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Testnet => "https://soroban-testnet.stellar.org",
            Network::Mainnet => "https://mainnet.sorobanrpc.com",
            Network::Sandbox => "http://localhost:8000",
        }
    }

    /// Network passphrase for transaction signing
    pub fn passphrase(&self) -> &'static str {
        match self {
            Network::Testnet => "Test SDF Network ; September 2015",
            Network::Mainnet => "Public Global Stellar Network ; September 2015",
            Network::Sandbox => "Standalone Network ; February 2017",
        }
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            "sandbox" => Ok(Network::Sandbox),
            other => Err(ConfigError::InvalidNetwork(other.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One network profile from soroban.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkProfile {
    pub rpc_url: Option<String>,
    pub network_passphrase: Option<String>,
    pub contract_id: Option<String>,
    pub source_account: Option<String>,
}

/// Parsed soroban.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SorobanToml {
    #[serde(default)]
    pub default: Option<DefaultProfile>,
    #[serde(default)]
    pub profile: HashMap<String, NetworkProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultProfile {
    pub network: Option<String>,
}

/// Resolved runtime configuration
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Active network
    pub network: Network,
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Network passphrase for signing
    pub network_passphrase: String,
    /// Deployed registry contract id, if known
    pub contract_id: Option<String>,
    /// Signing identity or account passed to the stellar CLI
    pub source_account: Option<String>,
}

impl Config {
    /// Load configuration from the environment and soroban.toml.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let toml_config = Self::load_toml("soroban.toml").unwrap_or_default();
        Self::resolve(&toml_config)
    }

    fn resolve(toml_config: &SorobanToml) -> Result<Self, ConfigError> {
        let network_name = std::env::var("SOROBAN_NETWORK").ok().or_else(|| {
            toml_config
                .default
                .as_ref()
                .and_then(|d| d.network.clone())
        });
        let network: Network = network_name.as_deref().unwrap_or("testnet").parse()?;

        let profile = toml_config.profile.get(network.as_str());

        let rpc_url = std::env::var("SOROBAN_RPC_URL")
            .ok()
            .or_else(|| profile.and_then(|p| p.rpc_url.clone()))
            .unwrap_or_else(|| network.default_rpc_url().to_string());

        let network_passphrase = std::env::var("SOROBAN_NETWORK_PASSPHRASE")
            .ok()
            .or_else(|| profile.and_then(|p| p.network_passphrase.clone()))
            .unwrap_or_else(|| network.passphrase().to_string());

        let contract_id = std::env::var("SOROBAN_CONTRACT_ID")
            .ok()
            .or_else(|| profile.and_then(|p| p.contract_id.clone()));

        let source_account = std::env::var("SOROBAN_ACCOUNT")
            .ok()
            .or_else(|| profile.and_then(|p| p.source_account.clone()));

        let config = Config {
            network,
            rpc_url,
            network_passphrase,
            contract_id,
            source_account,
        };
        config.validate()?;
        Ok(config)
    }

    fn load_toml(path: impl AsRef<Path>) -> Result<SorobanToml, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc_url.is_empty() {
            return Err(ConfigError::MissingField("rpc_url"));
        }
        if self.network_passphrase.is_empty() {
            return Err(ConfigError::MissingField("network_passphrase"));
        }
        if !self.rpc_url.starts_with("http://") && !self.rpc_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "RPC URL must start with http:// or https://: {}",
                self.rpc_url
            )));
        }
        Ok(())
    }

    /// Contract id, or an error when a command needs one and none is set.
    pub fn require_contract_id(&self) -> Result<&str, ConfigError> {
        self.contract_id
            .as_deref()
            .ok_or(ConfigError::MissingField("contract_id"))
    }

    /// Print the resolved configuration
    pub fn print_summary(&self) {
        println!("Resolved network configuration:");
        println!("  network:     {}", self.network);
        println!("  rpc_url:     {}", self.rpc_url);
        println!("  passphrase:  {}", self.network_passphrase);
        println!(
            "  contract_id: {}",
            self.contract_id.as_deref().unwrap_or("(not configured)")
        );
        println!(
            "  account:     {}",
            self.source_account.as_deref().unwrap_or("(not configured)")
        );
    }

    /// Get configuration as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
