// ⚙️ Configuration - Environment-driven settings for the CLI and server
//
// CLABE_CATALOGUE    optional path to a `code,name` CSV replacing the embedded table
// CLABE_SERVER_ADDR  bind address for clabe-server (default 0.0.0.0:3000)

use crate::entities::bank::{self, BankRegistry};
use crate::error::RegistryError;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const CATALOGUE_ENV: &str = "CLABE_CATALOGUE";
pub const SERVER_ADDR_ENV: &str = "CLABE_SERVER_ADDR";
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("failed to load bank catalogue {path:?}: {source}")]
    Catalogue {
        path: PathBuf,
        #[source]
        source: RegistryError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Custom bank table; `None` means the embedded catalogue
    pub catalogue_path: Option<PathBuf>,
    pub server_addr: SocketAddr,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let catalogue_path = lookup(CATALOGUE_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let addr = lookup(SERVER_ADDR_ENV).unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let server_addr: SocketAddr = addr.trim().parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::InvalidValue {
                key: SERVER_ADDR_ENV.to_string(),
                message: format!("{:?} is not a socket address ({})", addr, e),
            }
        })?;

        Ok(Config {
            catalogue_path,
            server_addr,
        })
    }

    /// The configured bank table, or the embedded catalogue
    pub fn registry(&self) -> Result<BankRegistry, ConfigError> {
        match &self.catalogue_path {
            Some(path) => {
                BankRegistry::from_csv_path(path).map_err(|source| ConfigError::Catalogue {
                    path: path.clone(),
                    source,
                })
            }
            None => Ok(bank::registry().clone()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            catalogue_path: None,
            server_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}
