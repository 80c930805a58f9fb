use crate::services::DEFAULT_SERVICES_FILE;
use crate::transport::AddressFamily;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Longest host accepted, brackets included
pub const MAX_HOST_LENGTH: usize = 255;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Attribute added to every request built from a configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestAttribute {
    pub name: String,
    pub value: String,
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server hostname, IPv4 literal or bracketed IPv6 literal
    #[serde(default)]
    pub server: Option<String>,

    /// Server port (0 = look up the service name, then use the standard port)
    #[serde(default)]
    pub port: u16,

    /// Shared secret
    #[serde(default)]
    pub secret: String,

    /// Reply timeout in milliseconds (default: 5000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Address family for resolution and the client socket (default: inet)
    #[serde(default)]
    pub address_family: AddressFamily,

    /// Dump sent and received packets to stdout
    #[serde(default)]
    pub debug: bool,

    /// Reject attribute values that do not convert instead of dropping them
    #[serde(default)]
    pub strict_values: bool,

    /// FreeRADIUS-format dictionary to load instead of the built-in one
    #[serde(default)]
    pub dictionary: Option<PathBuf>,

    /// Services database used for port lookup (default: /etc/services)
    #[serde(default = "default_services_file")]
    pub services_file: PathBuf,

    /// Log level: "trace", "debug", "info", "warn", "error" (default: "info")
    #[serde(default)]
    pub log_level: Option<String>,

    /// Attributes added to every request
    #[serde(default)]
    pub attributes: Vec<RequestAttribute>,
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_services_file() -> PathBuf {
    PathBuf::from(DEFAULT_SERVICES_FILE)
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server: None,
            port: 0,
            secret: String::new(),
            timeout_ms: default_timeout_ms(),
            address_family: AddressFamily::default(),
            debug: false,
            strict_values: false,
            dictionary: None,
            services_file: default_services_file(),
            log_level: None,
            attributes: vec![],
        }
    }
}

impl ClientConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: ClientConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(server) = &self.server {
            if server.is_empty() {
                return Err(ConfigError::Invalid("Server cannot be empty".to_string()));
            }
            if server.len() > MAX_HOST_LENGTH {
                return Err(ConfigError::Invalid(format!(
                    "Server name too long: {} bytes",
                    server.len()
                )));
            }
            if self.secret.is_empty() {
                return Err(ConfigError::Invalid(
                    "Secret cannot be empty when a server is set".to_string(),
                ));
            }
        }

        if let Some(level) = &self.log_level {
            if !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
                return Err(ConfigError::Invalid(format!("Invalid log level: {}", level)));
            }
        }

        for attr in &self.attributes {
            if attr.name.is_empty() || attr.value.is_empty() {
                return Err(ConfigError::Invalid(
                    "Request attribute has empty name or value".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Create an example configuration file
    pub fn example() -> Self {
        ClientConfig {
            server: Some("127.0.0.1".to_string()),
            port: 0,
            secret: "testing123".to_string(),
            timeout_ms: 5000,
            address_family: AddressFamily::Inet,
            debug: false,
            strict_values: false,
            dictionary: None,
            services_file: default_services_file(),
            log_level: Some("info".to_string()),
            attributes: vec![
                RequestAttribute {
                    name: "NAS-Identifier".to_string(),
                    value: "radclient".to_string(),
                },
                RequestAttribute {
                    name: "NAS-Port-Type".to_string(),
                    value: "Virtual".to_string(),
                },
            ],
        }
    }
}
