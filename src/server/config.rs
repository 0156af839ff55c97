//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::server::error::Error;

/// HTTP server configuration.
///
/// Missing fields take their default when loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// The maximum number of concurrent connections, at most
    /// [`Semaphore::MAX_PERMITS`].
    pub max_connections: usize,
    /// The read buffer size. Must be non-zero.
    pub read_buffer_size: usize,
    /// Value of the `Server` header on every response.
    pub server_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            max_connections: 1024,
            read_buffer_size: 8192,
            server_name: "microrouter-rs".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the limits the server relies on.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_connections == 0 || self.max_connections > Semaphore::MAX_PERMITS {
            return Err(Error::InvalidConfig(format!(
                "max_connections must be between 1 and {}, got {}",
                Semaphore::MAX_PERMITS,
                self.max_connections
            )));
        }
        if self.read_buffer_size == 0 {
            return Err(Error::InvalidConfig("read_buffer_size must be non-zero".to_string()));
        }
        Ok(())
    }
}
