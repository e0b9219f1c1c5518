//! Application configuration.
//!
//! Aggregates configuration from all modules into a single Config struct
//! that can be loaded from YAML files or environment variables.

mod contract;
mod network;
mod runtime;

pub use contract::{
    CounterConfig, MintConfig, DEFAULT_COUNTER_FIELD, DEFAULT_COUNTER_MODULE,
    DEFAULT_COUNTER_OBJECT, DEFAULT_COUNTER_PACKAGE, DEFAULT_INCREMENT_FUNCTION,
    DEFAULT_MINT_FUNCTION, DEFAULT_SUPPLY_FIELD,
};
pub use network::{NetworkConfig, DEFAULT_NETWORK, WELL_KNOWN_ENDPOINTS};
pub use runtime::{RetryConfig, RpcConfig, WatchConfig};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "sui-sync.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "SUI_SYNC_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "SUI_SYNC";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "SUI_SYNC_LOG";

use serde::Deserialize;

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fullnode selection.
    pub network: NetworkConfig,
    /// Fullnode request settings.
    pub rpc: RpcConfig,
    /// Shared counter identifiers.
    pub counter: CounterConfig,
    /// Coin minting identifiers (optional).
    pub mint: Option<MintConfig>,
    /// Initial-load backoff.
    pub retry: RetryConfig,
    /// Periodic counter polling.
    pub watch: WatchConfig,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Failed to read config file '{0}': {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Unknown network '{0}' (known: {1})")]
    UnknownNetwork(String, String),
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `sui-sync.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix, e.g.
    ///    `SUI_SYNC__NETWORK__ACTIVE=devnet`
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Load configuration from a single YAML file, without env overrides.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Create config for testing.
    pub fn for_test() -> Self {
        Self::default()
    }
}
