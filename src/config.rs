use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::models::{Address, Network};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub rpc: RpcConfig,
    pub contract: ContractConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Whole-request timeout in seconds
    pub request_timeout_seconds: u64,
}

/// Upstream node configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Avalanche C-Chain JSON-RPC endpoint
    pub avalanche_endpoint: String,
    /// Ethereum JSON-RPC endpoint
    pub ethereum_endpoint: String,
    /// Per-call timeout in seconds
    pub timeout_seconds: u64,
}

/// Contract whose logs the events endpoint serves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractConfig {
    pub address: String,
    /// Network name the contract lives on
    pub network: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_seconds: 35,
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            avalanche_endpoint: "https://rpc.ankr.com/avalanche".to_string(),
            ethereum_endpoint: "https://rpc.ankr.com/eth".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: "0x66357dCaCe80431aee0A7507e2E361B7e2402370".to_string(),
            network: "avalanche".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl RpcConfig {
    pub fn endpoint(&self, network: Network) -> Option<&str> {
        match network {
            Network::Avalanche => Some(&self.avalanche_endpoint),
            Network::Ethereum => Some(&self.ethereum_endpoint),
            Network::Unknown => None,
        }
    }
}

impl ContractConfig {
    pub fn parsed_address(&self) -> Result<Address, ConfigError> {
        Address::parse(&self.address).map_err(|_| ConfigError::InvalidValue {
            key: "contract.address".to_string(),
            value: self.address.clone(),
        })
    }

    pub fn resolved_network(&self) -> Result<Network, ConfigError> {
        match Network::resolve(&self.network) {
            Network::Unknown => Err(ConfigError::InvalidValue {
                key: "contract.network".to_string(),
                value: self.network.clone(),
            }),
            network => Ok(network),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

fn check_timeout(key: &str, seconds: u64) -> Result<(), ConfigError> {
    if seconds == 0 || seconds > 300 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: seconds.to_string(),
        });
    }
    Ok(())
}

impl AppConfig {
    /// Load configuration from file and environment variables.
    /// Environment variables take precedence over file values.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from_file()?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the TOML file named by `CONFIG_FILE`
    pub fn load_from_file() -> Result<Self, ConfigError> {
        let config_path = env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a TOML file; a missing file yields defaults
    pub fn load_from_path(config_path: &str) -> Result<Self, ConfigError> {
        if !Path::new(config_path).exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path)
            .map_err(|_| ConfigError::FileNotFound(config_path.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parsing(e.to_string()))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = parse_env("PORT", port)?;
        }
        if let Ok(timeout) = env::var("REQUEST_TIMEOUT_SECONDS") {
            self.server.request_timeout_seconds = parse_env("REQUEST_TIMEOUT_SECONDS", timeout)?;
        }

        if let Ok(endpoint) = env::var("AVALANCHE_RPC_URL") {
            self.rpc.avalanche_endpoint = endpoint;
        }
        if let Ok(endpoint) = env::var("ETHEREUM_RPC_URL") {
            self.rpc.ethereum_endpoint = endpoint;
        }
        if let Ok(timeout) = env::var("RPC_TIMEOUT_SECONDS") {
            self.rpc.timeout_seconds = parse_env("RPC_TIMEOUT_SECONDS", timeout)?;
        }

        if let Ok(address) = env::var("CONTRACT_ID") {
            self.contract.address = address;
        }
        if let Ok(network) = env::var("CONTRACT_NETWORK") {
            self.contract.network = network;
        }

        if let Ok(level) = env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        for endpoint in [&self.rpc.avalanche_endpoint, &self.rpc.ethereum_endpoint] {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ConfigError::InvalidUrl(endpoint.clone()));
            }
        }

        check_timeout("rpc.timeout_seconds", self.rpc.timeout_seconds)?;
        check_timeout("server.request_timeout_seconds", self.server.request_timeout_seconds)?;

        // Upstream calls must give up before the whole request does
        if self.server.request_timeout_seconds <= self.rpc.timeout_seconds {
            return Err(ConfigError::InvalidValue {
                key: "server.request_timeout_seconds".to_string(),
                value: self.server.request_timeout_seconds.to_string(),
            });
        }

        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "server.port".to_string(),
                value: self.server.port.to_string(),
            });
        }

        if self.server.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "server.host".to_string(),
                value: self.server.host.clone(),
            });
        }

        self.contract.parsed_address()?;
        self.contract.resolved_network()?;

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                value: self.logging.level.clone(),
            });
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.format".to_string(),
                value: self.logging.format.clone(),
            });
        }

        Ok(())
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Generate a sample configuration file
    pub fn generate_sample_config() -> Result<String, ConfigError> {
        toml::to_string_pretty(&Self::default()).map_err(|e| ConfigError::Parsing(e.to_string()))
    }
}
