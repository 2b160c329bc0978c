//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{Result, ServerError};

const DEFAULT_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Directory holding the SQLite database
    pub data_dir: PathBuf,
    /// Listen address
    pub bind: SocketAddr,
    /// Largest accepted request body in bytes
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: std::env::temp_dir().join("fra-atlas"),
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Read `FRA_ATLAS_DATA_DIR`, `FRA_ATLAS_BIND` and `FRA_ATLAS_BODY_LIMIT`,
    /// falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup("FRA_ATLAS_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(bind) = lookup("FRA_ATLAS_BIND") {
            config.bind = bind.parse().map_err(|_| {
                ServerError::Config(format!("FRA_ATLAS_BIND is not a socket address: {}", bind))
            })?;
        }
        if let Some(limit) = lookup("FRA_ATLAS_BODY_LIMIT") {
            config.body_limit = limit.parse().map_err(|_| {
                ServerError::Config(format!("FRA_ATLAS_BODY_LIMIT is not a byte count: {}", limit))
            })?;
        }

        Ok(config)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("fra-atlas.db")
    }
}
