//! Server configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Default host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5000;

/// Default SQLite database file
pub const DEFAULT_DATABASE: &str = "reviews.db";

/// Default storage timeout in milliseconds
pub const DEFAULT_STORAGE_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Path of the SQLite database file
    pub database: String,

    /// Upper bound on how long a storage operation may wait
    pub storage_timeout_ms: u64,

    /// Enable debug logging
    pub verbose: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_string(),
            storage_timeout_ms: DEFAULT_STORAGE_TIMEOUT_MS,
            verbose: false,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_storage_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.storage_timeout_ms = timeout_ms;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_millis(self.storage_timeout_ms)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
