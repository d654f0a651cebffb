//! Store configuration sourced from the environment.

use std::env;
use std::path::PathBuf;

use tracing::info;

const DEFAULT_DB_PATH: &str = "./data/vitalog.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Measurement store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    pub path: PathBuf,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Connection acquire timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl StoreConfig {
    /// Create a store configuration from environment variables, falling
    /// back to the defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let path = env::var("VITALOG_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH));

        let max_connections = env::var("VITALOG_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let timeout_seconds = env::var("VITALOG_DB_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);

        info!(
            "Store configuration: path={}, max_connections={}, timeout={}s",
            path.display(),
            max_connections,
            timeout_seconds
        );

        StoreConfig {
            path,
            max_connections,
            timeout_seconds,
        }
    }
}
