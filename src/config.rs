//! Configuration types.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::error::ConfigError;

/// HTTP server configuration, built from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// JSON catalog replacing the built-in programs.
    pub catalog_path: Option<PathBuf>,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    /// Populate demo employees at startup.
    pub seed_demo: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            catalog_path: None,
            cors_origins: Vec::new(),
            seed_demo: false,
        }
    }
}

impl ServerConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = match lookup("ONBOARD_HOST") {
            Some(raw) => raw.trim().parse::<IpAddr>().map_err(|_| ConfigError::InvalidValue {
                key: "ONBOARD_HOST".into(),
                message: format!("{raw:?} is not an IP address"),
            })?,
            None => defaults.host,
        };

        let port = match lookup("ONBOARD_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                key: "ONBOARD_PORT".into(),
                message: format!("{raw:?} is not a port number"),
            })?,
            None => defaults.port,
        };

        let catalog_path = lookup("ONBOARD_CATALOG_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let cors_origins = lookup("ONBOARD_CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let seed_demo = lookup("ONBOARD_SEED_DEMO")
            .map(|val| matches!(val.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.seed_demo);

        Ok(Self {
            host,
            port,
            catalog_path,
            cors_origins,
            seed_demo,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
