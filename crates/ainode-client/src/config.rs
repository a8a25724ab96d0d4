//! Client configuration
//!
//! All values are resolved before a client is built; nothing here is reloaded
//! at runtime.
//!
//! # Example
//!
//! ```rust
//! use ainode_client::ClientConfig;
//! use ainode_protocol::Endpoint;
//!
//! let config = ClientConfig::builder()
//!     .data_node(Endpoint::new("127.0.0.1", 10730))
//!     .config_nodes(vec![Endpoint::new("127.0.0.1", 10710)])
//!     .compression_enabled(true)
//!     .build();
//! assert!(config.validate().is_ok());
//! ```

use crate::{Error, Result};
use ainode_protocol::{Endpoint, WireFormat, MAX_MESSAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of attempts a config node call gets before giving up
pub const DEFAULT_RETRY_NUM: u32 = 5;
/// Wait between config node attempts, in milliseconds
pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 1;
/// Rows requested per page
pub const DEFAULT_FETCH_SIZE: u32 = 10_000;
/// Server-side query timeout, in milliseconds
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 60_000;

/// Resolved configuration shared by all clients built by a
/// [`ClientManager`](crate::ClientManager)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Data node serving query results
    pub data_node: Endpoint,
    /// Config node members; the first entry is the initial presumed leader
    pub config_nodes: Vec<Endpoint>,
    /// Use the compact wire encoding
    pub compression_enabled: bool,
    pub connect_timeout_ms: u64,
    /// Upper bound on a single request/response exchange
    pub request_timeout_ms: u64,
    pub max_frame_size: usize,
    pub retry_max_attempts: u32,
    pub retry_interval_ms: u64,
    pub fetch_size: u32,
    pub fetch_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_node: Endpoint::new("127.0.0.1", 10730),
            config_nodes: vec![Endpoint::new("127.0.0.1", 10710)],
            compression_enabled: false,
            connect_timeout_ms: 20_000,
            request_timeout_ms: 120_000,
            max_frame_size: MAX_MESSAGE_SIZE,
            retry_max_attempts: DEFAULT_RETRY_NUM,
            retry_interval_ms: DEFAULT_RETRY_INTERVAL_MS,
            fetch_size: DEFAULT_FETCH_SIZE,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// Create a new builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parse a YAML document; missing keys take their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ClientConfig =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.config_nodes.is_empty() {
            return Err(Error::Config("at least one config node is required".into()));
        }
        if self.retry_max_attempts == 0 {
            return Err(Error::Config("retry_max_attempts must be at least 1".into()));
        }
        if self.fetch_size == 0 {
            return Err(Error::Config("fetch_size must be at least 1".into()));
        }
        if self.max_frame_size == 0 || self.max_frame_size > MAX_MESSAGE_SIZE {
            return Err(Error::Config(format!(
                "max_frame_size must be between 1 and {}",
                MAX_MESSAGE_SIZE
            )));
        }
        Ok(())
    }

    pub fn wire_format(&self) -> WireFormat {
        WireFormat::from_compression(self.compression_enabled)
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_frame_size: self.max_frame_size,
            tcp_nodelay: true,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_max_attempts,
            interval: Duration::from_millis(self.retry_interval_ms),
        }
    }
}

/// Builder for [`ClientConfig`]
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn data_node(mut self, endpoint: Endpoint) -> Self {
        self.config.data_node = endpoint;
        self
    }

    pub fn config_nodes(mut self, endpoints: Vec<Endpoint>) -> Self {
        self.config.config_nodes = endpoints;
        self
    }

    pub fn compression_enabled(mut self, enabled: bool) -> Self {
        self.config.compression_enabled = enabled;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn max_frame_size(mut self, size: usize) -> Self {
        self.config.max_frame_size = size;
        self
    }

    pub fn retry_max_attempts(mut self, attempts: u32) -> Self {
        self.config.retry_max_attempts = attempts;
        self
    }

    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.config.retry_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn fetch_size(mut self, size: u32) -> Self {
        self.config.fetch_size = size;
        self
    }

    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Socket-level settings for a [`Connection`](crate::Connection)
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_frame_size: usize,
    pub tcp_nodelay: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        ClientConfig::default().transport()
    }
}

/// Retry budget of the leader-tracking client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Wait before every attempt but the first
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_NUM,
            interval: Duration::from_millis(DEFAULT_RETRY_INTERVAL_MS),
        }
    }
}
