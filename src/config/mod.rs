//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Port used when `PORT` is not set
pub const DEFAULT_PORT: u16 = 3000;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Directory served for unmatched paths
    pub public_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = port_from(env::var("PORT").ok())?;

        Ok(Self {
            server_addr: format!("0.0.0.0:{}", port)
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            public_dir: PathBuf::from("public"),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            log_level: "info".to_string(),
            public_dir: PathBuf::from("public"),
        }
    }
}

/// Unset or blank `PORT` falls back to [`DEFAULT_PORT`]
fn port_from(raw: Option<String>) -> Result<u16, ConfigError> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => parse_port(&raw),
        _ => Ok(DEFAULT_PORT),
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPort(raw.to_string()))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value: {0}")]
    InvalidPort(String),

    #[error("Invalid server address format")]
    InvalidAddress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_port_with_whitespace() {
        assert_eq!(parse_port(" 8080 ").unwrap(), 8080);
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!(matches!(parse_port("http"), Err(ConfigError::InvalidPort(_))));
        assert!(matches!(parse_port("70000"), Err(ConfigError::InvalidPort(_))));
    }

    #[test]
    fn blank_or_missing_port_uses_default() {
        assert_eq!(port_from(None).unwrap(), DEFAULT_PORT);
        assert_eq!(port_from(Some(String::new())).unwrap(), DEFAULT_PORT);
        assert_eq!(port_from(Some("   ".to_string())).unwrap(), DEFAULT_PORT);
        assert_eq!(port_from(Some("4000".to_string())).unwrap(), 4000);
    }

    #[test]
    fn default_listens_on_3000() {
        assert_eq!(Config::default().server_addr.port(), 3000);
    }
}
