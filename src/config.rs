//! Configuration management for the snapshot registrar
//!
//! Loads configuration from TOML files with environment variable substitution.

use crate::chain::Address;
use crate::error::{RegistrarError, RegistrarResult};
use crate::tx::gas::{DEFAULT_BASE_GAS, DEFAULT_PER_BYTE_MARGIN_FEE};
use crate::tx::transaction::DEFAULT_GAS_PRICE;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the settings file location
pub const CONFIG_PATH_ENV: &str = "SNAPSHOT_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

lazy_static! {
    static ref ENV_VAR_PATTERN: Regex =
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is valid");
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub registrar: RegistrarConfig,
    pub wallet: WalletConfig,
    pub networks: HashMap<String, NetworkSettings>,
}

/// Pipeline constants, overridable per deployment
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RegistrarConfig {
    /// Contract endpoint receiving the snapshot
    pub function: String,
    pub base_gas: u64,
    pub per_byte_margin_fee: u64,
    pub gas_price: u64,
    /// Window between announcing the submission and sending it
    pub grace_period_secs: u64,
    pub holders_page_size: u32,
    pub request_timeout_secs: u64,
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            function: "registerMembersSnapshot".to_string(),
            base_gas: DEFAULT_BASE_GAS,
            per_byte_margin_fee: DEFAULT_PER_BYTE_MARGIN_FEE,
            gas_price: DEFAULT_GAS_PRICE,
            grace_period_secs: 10,
            holders_page_size: 10_000,
            request_timeout_secs: 30,
        }
    }
}

impl RegistrarConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    pub pem_path: PathBuf,
}

/// Endpoints and targets for one network
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkSettings {
    pub api_url: String,
    pub proxy_url: String,
    pub token_id: String,
    pub contract_address: String,
}

impl NetworkSettings {
    pub fn contract(&self) -> RegistrarResult<Address> {
        Address::from_bech32(&self.contract_address).map_err(|e| {
            RegistrarError::Config(format!("Invalid contract address: {}", e))
        })
    }
}

impl Settings {
    /// Load settings from the configured file
    pub fn load() -> RegistrarResult<Self> {
        let config_path = env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        Self::load_from(&config_path)
    }

    /// Load settings from a specific file
    pub fn load_from(path: &Path) -> RegistrarResult<Self> {
        let config_str = std::fs::read_to_string(path).map_err(|e| {
            RegistrarError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::parse(&config_str)
    }

    /// Parse settings from TOML text
    pub fn parse(config_str: &str) -> RegistrarResult<Self> {
        // Substitute environment variables
        let config_str = substitute_env_vars(config_str);

        let settings: Settings = toml::from_str(&config_str)
            .map_err(|e| RegistrarError::Config(format!("Failed to parse configuration: {}", e)))?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration
    fn validate(&self) -> RegistrarResult<()> {
        if self.networks.is_empty() {
            return Err(RegistrarError::Config(
                "At least one network must be configured".to_string(),
            ));
        }
        if self.registrar.function.is_empty() {
            return Err(RegistrarError::Config("Contract function name is empty".to_string()));
        }
        if self.registrar.holders_page_size == 0 {
            return Err(RegistrarError::Config("holders_page_size must be positive".to_string()));
        }

        Ok(())
    }

    /// Get a network by name, checking its required fields
    ///
    /// Networks are validated on selection so unused sections may reference
    /// unset environment variables.
    pub fn network(&self, name: &str) -> RegistrarResult<&NetworkSettings> {
        let network = self
            .networks
            .get(name)
            .ok_or_else(|| RegistrarError::Config(format!("invalid '{}' config", name)))?;

        let required = [
            ("api_url", &network.api_url),
            ("proxy_url", &network.proxy_url),
            ("token_id", &network.token_id),
            ("contract_address", &network.contract_address),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(RegistrarError::Config(format!(
                    "Network {} has no {} configured",
                    name, field
                )));
            }
        }
        network.contract()?;

        Ok(network)
    }
}

/// Substitute environment variables in the format ${VAR_NAME}
fn substitute_env_vars(input: &str) -> String {
    ENV_VAR_PATTERN
        .replace_all(input, |caps: &regex::Captures| env::var(&caps[1]).unwrap_or_default())
        .into_owned()
}
