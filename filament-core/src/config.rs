//! Runtime configuration for the remote backend.

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable overriding [`RemoteConfig::bind_addr`].
pub const BIND_ADDR_ENV: &str = "FILAMENT_BIND_ADDR";

/// Environment variable overriding [`RemoteConfig::connect_timeout`], in seconds.
pub const CONNECT_TIMEOUT_ENV: &str = "FILAMENT_CONNECT_TIMEOUT_SECS";

const DEFAULT_PORT: u16 = 8081;
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`RemoteListener`](crate::remote::RemoteListener).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Local address the WebSocket listener binds to.
    pub bind_addr: SocketAddr,
    /// How long construction waits for the first peer before giving up.
    pub connect_timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl RemoteConfig {
    /// Build a config from the defaults, overridden by environment variables.
    ///
    /// Unset variables keep their defaults; set but malformed variables are
    /// reported as [`Error::Config`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup(BIND_ADDR_ENV) {
            config.bind_addr = addr
                .parse()
                .map_err(|e| Error::Config(format!("{BIND_ADDR_ENV}={addr}: {e}")))?;
        }

        if let Some(secs) = lookup(CONNECT_TIMEOUT_ENV) {
            let secs: u64 = secs
                .parse()
                .map_err(|e| Error::Config(format!("{CONNECT_TIMEOUT_ENV}={secs}: {e}")))?;
            config.connect_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Replace the bind address.
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    /// Replace the construction timeout.
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }
}
