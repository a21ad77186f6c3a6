//! Configuration management for the walletcheck service.
//!
//! This module handles loading configuration from:
//! - TOML files
//! - Environment variables via `${VAR_NAME}` placeholders
//! - Default values (fallbacks)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use walletcheck_core::constants::{
    DEFAULT_CHAIN_ID, DEFAULT_CHAIN_NAME, DEFAULT_FALLBACK_ETH_PRICE_USD,
};

/// Main configuration for the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chain identity reported in every assessment
    #[serde(default)]
    pub network: NetworkConfig,

    /// Upstream provider endpoints
    pub providers: ProvidersConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chain identity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Human-readable chain label (e.g. "Base")
    #[serde(default = "default_chain_name")]
    pub chain_name: String,

    /// Chain ID (e.g. 8453 for Base)
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
}

/// Upstream provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Etherscan-family account API base URL
    pub scan_api_url: String,

    /// Scan API key (use `${SCAN_API_KEY}` to load from the environment)
    pub scan_api_key: String,

    /// CoinGecko-family price API base URL
    #[serde(default = "default_price_api_url")]
    pub price_api_url: String,

    /// Price substituted when the price provider fails
    #[serde(default = "default_fallback_eth_price_usd")]
    pub fallback_eth_price_usd: f64,

    /// Per-request timeout for every upstream call, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Provider-side page cap for transaction history
    #[serde(default = "default_tx_page_size")]
    pub tx_page_size: u32,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind, e.g. "0.0.0.0:8080"
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_chain_name() -> String {
    DEFAULT_CHAIN_NAME.to_string()
}

fn default_chain_id() -> u64 {
    DEFAULT_CHAIN_ID
}

fn default_price_api_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

fn default_fallback_eth_price_usd() -> f64 {
    DEFAULT_FALLBACK_ETH_PRICE_USD
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_tx_page_size() -> u32 {
    1000
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_name: default_chain_name(),
            chain_id: default_chain_id(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// Environment variables can be referenced using `${VAR_NAME}` syntax.
    /// For example: `scan_api_key = "${SCAN_API_KEY}"`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        // Expand environment variables before parsing
        let expanded = Self::expand_env_vars(&contents)?;

        let config: Config = toml::from_str(&expanded)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml).context("Failed to parse TOML configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.network.chain_name.trim().is_empty() {
            anyhow::bail!("Network chain_name cannot be empty");
        }
        if self.network.chain_id == 0 {
            anyhow::bail!("Chain ID must be non-zero");
        }

        for (name, url) in [
            ("scan_api_url", &self.providers.scan_api_url),
            ("price_api_url", &self.providers.price_api_url),
        ] {
            if url.is_empty() {
                anyhow::bail!("Providers {} cannot be empty", name);
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("Providers {} must start with http:// or https://", name);
            }
        }

        if self.providers.scan_api_key.is_empty() {
            anyhow::bail!("Providers scan_api_key cannot be empty");
        }
        if self.providers.request_timeout_secs == 0 {
            anyhow::bail!("Providers request_timeout_secs must be > 0");
        }
        if self.providers.tx_page_size == 0 || self.providers.tx_page_size > 10_000 {
            anyhow::bail!(
                "Providers tx_page_size must be between 1 and 10000 (got {})",
                self.providers.tx_page_size
            );
        }
        if !self.providers.fallback_eth_price_usd.is_finite()
            || self.providers.fallback_eth_price_usd <= 0.0
        {
            anyhow::bail!(
                "Providers fallback_eth_price_usd must be a positive number (got {})",
                self.providers.fallback_eth_price_usd
            );
        }

        if self.server.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            anyhow::bail!(
                "Server bind_addr must be a host:port socket address (got '{}')",
                self.server.bind_addr
            );
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!(
                "Logging level must be one of: {} (got '{}')",
                valid_levels.join(", "),
                self.logging.level
            );
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!(
                "Logging format must be one of: {} (got '{}')",
                valid_formats.join(", "),
                self.logging.format
            );
        }

        Ok(())
    }

    /// Construct a config pointing at local mock providers. Used by the
    /// in-process integration tests.
    pub fn for_test(scan_api_url: String, price_api_url: String) -> Self {
        Self {
            network: NetworkConfig::default(),
            providers: ProvidersConfig {
                scan_api_url,
                scan_api_key: "test-key".to_string(),
                price_api_url,
                fallback_eth_price_usd: default_fallback_eth_price_usd(),
                request_timeout_secs: 5,
                tx_page_size: default_tx_page_size(),
            },
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Expand environment variables in the format `${VAR_NAME}`.
    ///
    /// Placeholders on comment lines (first non-whitespace character `#`)
    /// are left untouched so documentation examples never fail expansion.
    ///
    /// # Errors
    /// Returns an error if a referenced environment variable is not set or
    /// a placeholder is left unclosed.
    fn expand_env_vars(input: &str) -> Result<String> {
        let mut result = String::with_capacity(input.len());

        for (line_no, line) in input.lines().enumerate() {
            if line.trim_start().starts_with('#') {
                result.push_str(line);
                result.push('\n');
                continue;
            }

            let mut rest = line;
            while let Some(start) = rest.find("${") {
                result.push_str(&rest[..start]);
                let after = &rest[start + 2..];
                let end = after.find('}').ok_or_else(|| {
                    anyhow::anyhow!(
                        "Unclosed environment variable placeholder on line {}",
                        line_no + 1
                    )
                })?;
                let var_name = &after[..end];
                if var_name.is_empty() {
                    anyhow::bail!("Empty environment variable name on line {}", line_no + 1);
                }
                let value = std::env::var(var_name).with_context(|| {
                    format!(
                        "Environment variable '{}' is not set (referenced on line {})",
                        var_name,
                        line_no + 1
                    )
                })?;
                result.push_str(&value);
                rest = &after[end + 1..];
            }
            result.push_str(rest);
            result.push('\n');
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[providers]
scan_api_url = "https://api.basescan.org/api"
scan_api_key = "abc123"
    "#;

    #[test]
    fn test_minimal_config_applies_defaults() {
        let config = Config::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.network.chain_name, "Base");
        assert_eq!(config.network.chain_id, 8453);
        assert_eq!(config.providers.price_api_url, "https://api.coingecko.com/api/v3");
        assert_eq!(config.providers.request_timeout_secs, 10);
        assert_eq!(config.providers.tx_page_size, 1000);
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_full_config_round_trip() {
        let toml = r#"
[network]
chain_name = "Base Sepolia"
chain_id = 84532

[providers]
scan_api_url = "https://api-sepolia.basescan.org/api"
scan_api_key = "abc123"
price_api_url = "https://api.coingecko.com/api/v3"
fallback_eth_price_usd = 2000.0
request_timeout_secs = 5
tx_page_size = 500

[server]
bind_addr = "127.0.0.1:9090"

[logging]
level = "debug"
format = "json"
        "#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.network.chain_id, 84532);
        assert_eq!(config.providers.tx_page_size, 500);
        assert_eq!(config.server.bind_addr, "127.0.0.1:9090");
    }

    #[test]
    fn test_validation_empty_scan_url() {
        let toml = r#"
[providers]
scan_api_url = ""
scan_api_key = "abc123"
        "#;
        let result = Config::from_toml_str(toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("scan_api_url"));
    }

    #[test]
    fn test_validation_bad_url_scheme() {
        let toml = r#"
[providers]
scan_api_url = "ftp://example.com"
scan_api_key = "abc123"
        "#;
        let result = Config::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let toml = r#"
[providers]
scan_api_url = "https://api.basescan.org/api"
scan_api_key = "abc123"
request_timeout_secs = 0
        "#;
        let result = Config::from_toml_str(toml);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("request_timeout_secs"));
    }

    #[test]
    fn test_validation_bad_bind_addr() {
        let toml = r#"
[providers]
scan_api_url = "https://api.basescan.org/api"
scan_api_key = "abc123"

[server]
bind_addr = "not-an-address"
        "#;
        let result = Config::from_toml_str(toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("bind_addr"));
    }

    #[test]
    fn test_validation_bad_log_level() {
        let toml = r#"
[providers]
scan_api_url = "https://api.basescan.org/api"
scan_api_key = "abc123"

[logging]
level = "verbose"
        "#;
        let result = Config::from_toml_str(toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Logging level"));
    }

    #[test]
    fn test_expand_env_vars() {
        std::env::set_var("WALLETCHECK_TEST_KEY", "secret");
        let result = Config::expand_env_vars("key = \"${WALLETCHECK_TEST_KEY}\"").unwrap();
        assert_eq!(result, "key = \"secret\"\n");
        std::env::remove_var("WALLETCHECK_TEST_KEY");
    }

    #[test]
    fn test_expand_env_vars_undefined() {
        let result = Config::expand_env_vars("key = \"${WALLETCHECK_UNDEFINED_VAR}\"");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("WALLETCHECK_UNDEFINED_VAR"));
    }

    #[test]
    fn test_expand_env_vars_unclosed() {
        let result = Config::expand_env_vars("key = \"${UNCLOSED");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unclosed"));
    }

    #[test]
    fn test_expand_env_vars_ignores_comment_lines() {
        let input = "# example: key = \"${EXAMPLE_VAR}\"\nvalue = 1";
        let result = Config::expand_env_vars(input).unwrap();
        assert!(result.contains("${EXAMPLE_VAR}"));
        assert!(result.contains("value = 1"));
    }

    #[test]
    fn test_config_with_env_vars() {
        std::env::set_var("WALLETCHECK_TEST_API_KEY", "from-env");
        let toml = r#"
[providers]
scan_api_url = "https://api.basescan.org/api"
# Example: scan_api_key = "${SCAN_API_KEY}"
scan_api_key = "${WALLETCHECK_TEST_API_KEY}"
        "#;
        let expanded = Config::expand_env_vars(toml).unwrap();
        let config = Config::from_toml_str(&expanded).unwrap();
        assert_eq!(config.providers.scan_api_key, "from-env");
        std::env::remove_var("WALLETCHECK_TEST_API_KEY");
    }
}
