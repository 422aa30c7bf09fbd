//! Configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SILKCRAFT_HOST` - Bind address (default: 0.0.0.0)
//! - `SILKCRAFT_PORT` - Listen port (default: 8083)
//! - `SILKCRAFT_DATA_DIR` - Directory for durable cart/user documents. When
//!   unset, state lives in memory and is lost on restart.
//! - `SILKCRAFT_MOCK_DELAY_MS` - Simulated latency of mock login, register and
//!   checkout calls (default: 1000)
//! - `SILKCRAFT_PAGE_SIZE` - Catalog page size (default: 12)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_PORT: u16 = 8083;
const DEFAULT_MOCK_DELAY_MS: u64 = 1000;
const DEFAULT_PAGE_SIZE: usize = 12;
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub data_dir: Option<PathBuf>,
    pub mock_delay: Duration,
    pub page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            data_dir: None,
            mock_delay: Duration::from_millis(DEFAULT_MOCK_DELAY_MS),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let page_size = parse_or(&lookup, "SILKCRAFT_PAGE_SIZE", defaults.page_size)?;
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidEnvVar("SILKCRAFT_PAGE_SIZE".into(), format!("must be between 1 and {MAX_PAGE_SIZE}")));
        }
        Ok(Self {
            host: parse_or(&lookup, "SILKCRAFT_HOST", defaults.host)?,
            port: parse_or(&lookup, "SILKCRAFT_PORT", defaults.port)?,
            data_dir: lookup("SILKCRAFT_DATA_DIR").filter(|v| !v.trim().is_empty()).map(PathBuf::from),
            mock_delay: Duration::from_millis(parse_or(&lookup, "SILKCRAFT_MOCK_DELAY_MS", DEFAULT_MOCK_DELAY_MS)?),
            page_size,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr { SocketAddr::new(self.host, self.port) }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.socket_addr().port(), 8083);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SILKCRAFT_HOST", "127.0.0.1"),
            ("SILKCRAFT_PORT", "9000"),
            ("SILKCRAFT_DATA_DIR", "/var/lib/silkcraft"),
            ("SILKCRAFT_MOCK_DELAY_MS", "0"),
            ("SILKCRAFT_PAGE_SIZE", "4"),
        ])
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/silkcraft")));
        assert!(config.mock_delay.is_zero());
        assert_eq!(config.page_size, 4);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(load(&[("SILKCRAFT_PORT", "eighty")]), Err(ConfigError::InvalidEnvVar(k, _)) if k == "SILKCRAFT_PORT"));
        assert!(load(&[("SILKCRAFT_PAGE_SIZE", "0")]).is_err());
        assert!(load(&[("SILKCRAFT_PAGE_SIZE", "500")]).is_err());
    }
}
