//! Configuration management
//!
//! Loads configuration from TOML files with environment variable substitution.
//! Settings are built once at startup and passed to constructors explicitly.

use crate::tx::{Fee, TESTNET_PASSPHRASE};

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Longest accepted delay between status queries
pub const MAX_POLL_INTERVAL_MS: u64 = 3_600_000;
/// Longest accepted confirmation deadline
pub const MAX_POLL_DEADLINE_SECS: u64 = 86_400;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub network: NetworkConfig,
    #[serde(default)]
    pub transaction: TransactionConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub signer: SignerConfig,
    #[serde(default)]
    pub events: EventsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    pub rpc_url: String,
    #[serde(default = "default_passphrase")]
    pub network_passphrase: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionConfig {
    /// Inclusion fee as a numeric string
    #[serde(default = "default_fee")]
    pub fee: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            fee: default_fee(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollerConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
            deadline_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignerConfig {
    /// Environment variable holding the hex encoded secret seed
    #[serde(default = "default_secret_env")]
    pub secret_env: String,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            secret_env: default_secret_env(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    /// Ledgers to look back from the latest one
    #[serde(default = "default_lookback")]
    pub lookback: u32,
    #[serde(default = "default_event_limit")]
    pub limit: u32,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            lookback: default_lookback(),
            limit: default_event_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_passphrase() -> String {
    TESTNET_PASSPHRASE.to_string()
}

fn default_fee() -> String {
    Fee::base().to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    30
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_secret_env() -> String {
    "TXFLOW_SECRET_KEY".to_string()
}

fn default_lookback() -> u32 {
    100
}

fn default_event_limit() -> u32 {
    1000
}

fn default_log_filter() -> String {
    "info,txflow=debug".to_string()
}

impl Settings {
    /// Load settings from the file named by `TXFLOW_CONFIG`
    pub fn load() -> Result<Self> {
        let config_path = env::var("TXFLOW_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config/default.toml"));
        Self::load_from(&config_path)
    }

    /// Load settings from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml_str(&config_str)
    }

    /// Parse settings from TOML text, substituting `${VAR}` references
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config_str = substitute_env_vars(input);

        let settings: Settings =
            toml::from_str(&config_str).with_context(|| "Failed to parse configuration")?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.network.rpc_url.trim().is_empty() {
            anyhow::bail!("network.rpc_url must be set");
        }
        if self.network.network_passphrase.is_empty() {
            anyhow::bail!("network.network_passphrase must not be empty");
        }
        if self.transaction.timeout_secs == 0 {
            anyhow::bail!("transaction.timeout_secs must be positive");
        }
        self.transaction
            .fee
            .parse::<Fee>()
            .map_err(|e| anyhow::anyhow!("transaction.fee: {}", e))?;
        if self.poller.max_attempts == 0 {
            anyhow::bail!("poller.max_attempts must be positive");
        }
        if self.poller.interval_ms == 0 || self.poller.interval_ms > MAX_POLL_INTERVAL_MS {
            anyhow::bail!(
                "poller.interval_ms must be between 1 and {}",
                MAX_POLL_INTERVAL_MS
            );
        }
        if let Some(deadline) = self.poller.deadline_secs {
            if deadline == 0 || deadline > MAX_POLL_DEADLINE_SECS {
                anyhow::bail!(
                    "poller.deadline_secs must be between 1 and {} when set",
                    MAX_POLL_DEADLINE_SECS
                );
            }
        }
        if self.events.limit == 0 {
            tracing::warn!("events.limit is 0 - event queries will return nothing");
        }

        Ok(())
    }
}

/// Substitute environment variables in the format ${VAR_NAME}
fn substitute_env_vars(input: &str) -> String {
    lazy_static::lazy_static! {
        static ref ENV_VAR: regex::Regex =
            regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid regex");
    }

    ENV_VAR
        .replace_all(input, |cap: &regex::Captures| {
            env::var(&cap[1]).unwrap_or_default()
        })
        .into_owned()
}
