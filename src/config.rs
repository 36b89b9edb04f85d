//! Configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable
//! overrides for deployment-specific values. The wallet private key is only
//! ever read from the environment (`WALLET_PRIVATE_KEY`), never from the
//! file.

use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};

/// Chain id of the default deployment (Monad testnet).
pub const DEFAULT_CHAIN_ID: u64 = 10143;

/// Default slippage tolerance in basis points (100 = 1%).
pub const DEFAULT_SLIPPAGE_BPS: u32 = 100;

/// Environment variable overriding the quote proxy URL.
pub const ENV_QUOTE_URL: &str = "KIOSKO_QUOTE_URL";

/// Environment variable overriding the RPC URL.
pub const ENV_RPC_URL: &str = "KIOSKO_RPC_URL";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub quote: QuoteConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Quote service settings.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteConfig {
    /// Proxy endpoint forwarding to the aggregator's quote API. Must end
    /// with the `/quote` path.
    #[serde(default)]
    pub url: String,
    /// Slippage tolerance in basis points.
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u32,
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_http_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

const fn default_slippage_bps() -> u32 {
    DEFAULT_SLIPPAGE_BPS
}

const fn default_http_timeout_ms() -> u64 {
    5000
}

const fn default_http_connect_timeout_ms() -> u64 {
    2000
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            slippage_bps: default_slippage_bps(),
            timeout_ms: default_http_timeout_ms(),
            connect_timeout_ms: default_http_connect_timeout_ms(),
        }
    }
}

/// Chain connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
}

fn default_rpc_url() -> String {
    "https://testnet-rpc.monad.xyz".into()
}

const fn default_chain_id() -> u64 {
    DEFAULT_CHAIN_ID
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            chain_id: default_chain_id(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl Config {
    /// Load from a TOML file, apply environment overrides, and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for unreadable or unparsable files and for
    /// invalid values.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file when it exists; otherwise start from defaults.
    /// Environment overrides and validation apply either way.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for unparsable files and invalid values.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::load(path);
        }
        let mut config = Config::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(ENV_QUOTE_URL) {
            self.quote.url = url;
        }
        if let Ok(url) = std::env::var(ENV_RPC_URL) {
            self.network.rpc_url = url;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.network.rpc_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "network.rpc_url",
            }
            .into());
        }
        if self.network.chain_id == 0 {
            return Err(ConfigError::InvalidValue {
                field: "network.chain_id",
                reason: "chain id must be nonzero".into(),
            }
            .into());
        }
        if self.quote.slippage_bps > 10_000 {
            return Err(ConfigError::InvalidValue {
                field: "quote.slippage_bps",
                reason: format!("{} exceeds 10000 (100%)", self.quote.slippage_bps),
            }
            .into());
        }
        Ok(())
    }
}
