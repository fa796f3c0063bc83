//! Server configuration.
//!
//! Every field has a default, so an empty file is a valid configuration:
//! ```toml
//! host = "127.0.0.1"
//! port = 8082
//! context_path = "/api"
//! workers = 8
//! ```
use crate::error::{Error, Result};
use crate::path::normalize_context;

use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use serde::Deserialize;

/// Settings for [`App`](crate::App).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// IP address to listen on.
    pub host: String,
    pub port: u16,
    /// Path prefix the application is mounted under.
    pub context_path: String,
    /// Upper bound on threads running handlers.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_owned(),
            port: 8080,
            context_path: "/".to_owned(),
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }
}

impl Config {
    /// Parses and validates a TOML configuration.
    ///
    /// ```rust
    /// use ligero::Config;
    ///
    /// let config = Config::from_toml("port = 8082\ncontext_path = \"api/\"").unwrap();
    /// assert_eq!(config.port, 8082);
    /// assert_eq!(config.context_path, "/api");
    /// ```
    pub fn from_toml(content: &str) -> Result<Config> {
        let mut config: Config = toml::from_str(content)?;
        config.context_path = normalize_context(&config.context_path);
        config.validate()?;
        Ok(config)
    }

    /// Loads a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Config> {
        let content = fs::read_to_string(path)?;
        Config::from_toml(&content)
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_context_path(mut self, context_path: &str) -> Self {
        self.context_path = normalize_context(context_path);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Checks the values a TOML parser cannot.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidConfig {
                field: "workers".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }
        self.socket_addr()?;
        Ok(())
    }

    /// The address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip = self.host.parse::<IpAddr>()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
