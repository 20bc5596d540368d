use serde::Deserialize;
use std::env;
use std::fs;
use std::time::Duration;

use crate::error::{FtpClientError, Result};

/// Default FTP control port
pub const DEFAULT_FTP_PORT: u16 = 21;

/// Default per-operation timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for an FTP session
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Server configuration
    pub server: ServerSettings,

    /// Login credentials
    pub credentials: Credentials,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// FTP server hostname or IP address
    pub host: String,

    /// FTP server control port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-operation timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// Username for USER command
    pub username: String,

    /// Password for PASS command
    pub password: String,
}

fn default_port() -> u16 {
    DEFAULT_FTP_PORT
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl SessionConfig {
    /// Create a configuration for the default port and timeout
    pub fn new(host: &str, username: &str, password: &str) -> Self {
        Self {
            server: ServerSettings {
                host: host.to_string(),
                port: DEFAULT_FTP_PORT,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            credentials: Credentials {
                username: username.to_string(),
                password: password.to_string(),
            },
        }
    }

    /// Override the control port
    pub fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    /// Override the per-operation timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.server.timeout_secs = secs;
        self
    }

    /// Create configuration from a TOML file with environment variable overrides
    pub fn from_config_file(config_path: &str) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            FtpClientError::ConfigFileNotFound(format!(
                "Cannot read config file '{}': {}",
                config_path, e
            ))
        })?;

        let mut config: SessionConfig = toml::from_str(&config_content).map_err(|e| {
            FtpClientError::ConfigFileParseError(format!(
                "Invalid TOML in '{}': {}",
                config_path, e
            ))
        })?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides to config
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = env::var("FTP_HOST") {
            self.server.host = host;
        }

        if let Ok(port_str) = env::var("FTP_PORT") {
            self.server.port = port_str.parse().map_err(|_| {
                FtpClientError::InvalidConfigValue(
                    "FTP_PORT must be a valid port number".to_string(),
                )
            })?;
        }

        if let Ok(timeout_str) = env::var("FTP_TIMEOUT_SECS") {
            self.server.timeout_secs = timeout_str.parse().map_err(|_| {
                FtpClientError::InvalidConfigValue(
                    "FTP_TIMEOUT_SECS must be a valid number of seconds".to_string(),
                )
            })?;
        }

        if let Ok(username) = env::var("FTP_USER") {
            self.credentials.username = username;
        }

        if let Ok(password) = env::var("FTP_PASSWORD") {
            self.credentials.password = password;
        }

        Ok(())
    }

    pub fn host(&self) -> &str {
        &self.server.host
    }

    pub fn port(&self) -> u16 {
        self.server.port
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs)
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    pub fn password(&self) -> &str {
        &self.credentials.password
    }

    /// Validate the basic configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            return Err(FtpClientError::InvalidConfigValue(
                "Host cannot be empty".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(FtpClientError::InvalidConfigValue(
                "Port cannot be 0".to_string(),
            ));
        }

        if self.server.timeout_secs == 0 {
            return Err(FtpClientError::InvalidConfigValue(
                "Timeout cannot be 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", "anonymous", "")
    }
}

impl std::fmt::Display for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FTP Session Config - Server: {}:{}, User: {}, Timeout: {}s",
            self.server.host,
            self.server.port,
            self.credentials.username,
            self.server.timeout_secs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.port(), DEFAULT_FTP_PORT);
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.username(), "anonymous");
    }

    #[test]
    fn test_builder_overrides() {
        let config = SessionConfig::new("ftp.example.com", "alice", "secret")
            .with_port(2121)
            .with_timeout_secs(3);
        assert_eq!(config.host(), "ftp.example.com");
        assert_eq!(config.port(), 2121);
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.password(), "secret");
    }

    #[test]
    fn test_toml_parsing_with_defaults() {
        let parsed: SessionConfig = toml::from_str(
            r#"
            [server]
            host = "192.168.2.50"

            [credentials]
            username = "logger"
            password = "pw"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.host(), "192.168.2.50");
        assert_eq!(parsed.port(), DEFAULT_FTP_PORT);
        assert_eq!(parsed.server.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_validation_rejects_empty_host() {
        let mut config = SessionConfig::default();
        config.server.host = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let mut config = SessionConfig::default();
        config.server.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_display_hides_password() {
        let config = SessionConfig::new("h", "u", "topsecret");
        assert!(!format!("{}", config).contains("topsecret"));
    }
}
