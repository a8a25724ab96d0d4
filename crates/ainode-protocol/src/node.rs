//! Worker node descriptors exchanged with the config node cluster

use crate::Endpoint;
use serde::{Deserialize, Serialize};

/// Cluster-assigned node identifier
pub type NodeId = i32;

/// Where a worker node lives
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeLocation {
    /// Node ID, `-1` before registration
    pub node_id: NodeId,
    /// Endpoint used for internal RPC
    pub internal_endpoint: Endpoint,
}

impl NodeLocation {
    pub fn new(node_id: NodeId, internal_endpoint: Endpoint) -> Self {
        Self {
            node_id,
            internal_endpoint,
        }
    }

    /// Location of a node that has not been assigned an ID yet
    pub fn unregistered(internal_endpoint: Endpoint) -> Self {
        Self::new(-1, internal_endpoint)
    }
}

/// Hardware resources a worker node advertises
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeResource {
    pub cpu_cores: u32,
    pub memory_bytes: u64,
}

/// Full configuration a worker node registers with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfiguration {
    pub location: NodeLocation,
    pub resource: NodeResource,
}

impl NodeConfiguration {
    pub fn new(location: NodeLocation) -> Self {
        Self {
            location,
            resource: NodeResource::default(),
        }
    }

    /// Set advertised resources
    pub fn with_resource(mut self, cpu_cores: u32, memory_bytes: u64) -> Self {
        self.resource = NodeResource {
            cpu_cores,
            memory_bytes,
        };
        self
    }
}

/// Build information sent on register/restart for compatibility checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeVersionInfo {
    pub version: String,
    pub build_info: String,
}

impl NodeVersionInfo {
    pub fn new(version: impl Into<String>, build_info: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            build_info: build_info.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_configuration_builder() {
        let location = NodeLocation::unregistered(Endpoint::new("ainode-1", 10810));
        assert_eq!(location.node_id, -1);

        let config = NodeConfiguration::new(location.clone()).with_resource(8, 1 << 30);
        assert_eq!(config.location, location);
        assert_eq!(config.resource.cpu_cores, 8);
        assert_eq!(config.resource.memory_bytes, 1 << 30);
    }
}
