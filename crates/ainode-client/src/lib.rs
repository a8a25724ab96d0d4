//! AINode cluster clients
//!
//! Two clients built by a [`ClientManager`] from one [`ClientConfig`]:
//!
//! - [`ConfigNodeClient`] talks to the replicated config node group. It keeps
//!   track of the presumed leader, follows redirects, fails over round-robin
//!   across known members and gives up after a fixed number of attempts.
//! - [`DataNodeClient`] runs a time-series query against one data node and
//!   pulls result pages until the server reports no more data. It never
//!   retries.
//!
//! # Example
//!
//! ```rust,ignore
//! use ainode_client::{ClientConfig, ClientManager};
//! use ainode_protocol::{Endpoint, NodeConfiguration, NodeLocation, NodeVersionInfo};
//!
//! let config = ClientConfig::from_yaml_str(&std::fs::read_to_string("ainode.yaml")?)?;
//! let manager = ClientManager::new(config)?;
//!
//! let mut config_nodes = manager.config_node_client()?;
//! let location = NodeLocation::unregistered(Endpoint::new("127.0.0.1", 10810));
//! let node_id = config_nodes
//!     .register_node(
//!         "defaultCluster",
//!         NodeConfiguration::new(location),
//!         NodeVersionInfo::new("1.3.0", "abc123"),
//!     )
//!     .await?;
//!
//! let mut data_node = manager.data_node_client().await?;
//! let dataset = data_node.fetch_timeseries("SELECT s0 FROM root.eg.d0").await?;
//! ```

pub mod config;
pub mod config_node;
pub mod connection;
pub mod data_node;
pub mod dataset;
pub mod error;
pub mod manager;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod transport;

pub use config::{ClientConfig, ClientConfigBuilder, RetryPolicy, TransportConfig};
pub use config_node::{
    ConfigNodeClient, Leader, MembershipRefresher, NoopRefresher, StaticSeedRefresher,
    MSG_RECONNECTION_FAIL,
};
pub use connection::{Connection, TcpConnector};
pub use data_node::{DataNodeClient, QuerySession};
pub use dataset::{ColumnLayout, Dataset, Row, Value};
pub use error::{Error, Result};
pub use manager::ClientManager;
pub use transport::{Channel, Connector};
