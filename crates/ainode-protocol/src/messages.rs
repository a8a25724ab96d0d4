//! Request and response messages for the config-node and data-node services

use crate::{Endpoint, NodeConfiguration, NodeId, NodeLocation, NodeVersionInfo, RawRow, Status, TypeTag};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Config node service
// ============================================================================

/// Register a worker node with the cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRegisterReq {
    pub cluster_name: String,
    pub configuration: NodeConfiguration,
    pub version_info: NodeVersionInfo,
}

/// Announce that a previously registered worker node restarted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRestartReq {
    pub cluster_name: String,
    pub configuration: NodeConfiguration,
    pub version_info: NodeVersionInfo,
}

/// Requests understood by a config node
///
/// **WARNING**: Variant order must remain stable for serialization compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigRequest {
    RegisterNode(NodeRegisterReq),
    RestartNode(NodeRestartReq),
    RemoveNode { location: NodeLocation },
    GetNodeConfiguration { node_id: NodeId },
}

impl ConfigRequest {
    /// Operation name used in logs and errors
    pub fn operation(&self) -> &'static str {
        match self {
            ConfigRequest::RegisterNode(_) => "register_node",
            ConfigRequest::RestartNode(_) => "restart_node",
            ConfigRequest::RemoveNode { .. } => "remove_node",
            ConfigRequest::GetNodeConfiguration { .. } => "get_node_configuration",
        }
    }
}

/// Responses sent by a config node
///
/// **WARNING**: Variant order must remain stable for serialization compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigResponse {
    /// Registration result with the assigned node ID
    Registered {
        status: Status,
        config_nodes: Vec<Endpoint>,
        node_id: NodeId,
    },
    Restarted {
        status: Status,
        config_nodes: Vec<Endpoint>,
    },
    Removed { status: Status },
    /// Configuration of one node, or of all nodes
    Configuration {
        status: Status,
        configurations: HashMap<NodeId, NodeConfiguration>,
    },
}

impl ConfigResponse {
    pub fn status(&self) -> &Status {
        match self {
            ConfigResponse::Registered { status, .. }
            | ConfigResponse::Restarted { status, .. }
            | ConfigResponse::Removed { status }
            | ConfigResponse::Configuration { status, .. } => status,
        }
    }

    /// Current config node membership, for responses that carry it
    pub fn config_nodes(&self) -> Option<&[Endpoint]> {
        match self {
            ConfigResponse::Registered { config_nodes, .. }
            | ConfigResponse::Restarted { config_nodes, .. } => Some(config_nodes),
            ConfigResponse::Removed { .. } | ConfigResponse::Configuration { .. } => None,
        }
    }
}

// ============================================================================
// Data node service
// ============================================================================

/// Requests understood by a data node
///
/// **WARNING**: Variant order must remain stable for serialization compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataRequest {
    /// Run a query and return its first page
    FetchTimeseries {
        query_body: String,
        fetch_size: u32,
        timeout_ms: u64,
    },
    /// Fetch the next page of an open query
    FetchMoreData { query_id: i64, fetch_size: u32 },
}

impl DataRequest {
    pub fn operation(&self) -> &'static str {
        match self {
            DataRequest::FetchTimeseries { .. } => "fetch_timeseries",
            DataRequest::FetchMoreData { .. } => "fetch_more_data",
        }
    }
}

/// First page of a query together with its column layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchTimeseriesResp {
    pub status: Status,
    pub query_id: i64,
    pub column_names: Vec<String>,
    pub column_types: Vec<TypeTag>,
    /// Column name to cell position within each [`RawRow`]
    pub column_index: HashMap<String, usize>,
    pub rows: Vec<RawRow>,
    pub has_more: bool,
}

/// A follow-up page of an open query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchMoreDataResp {
    pub status: Status,
    pub rows: Vec<RawRow>,
    pub has_more: bool,
}

/// Responses sent by a data node
///
/// **WARNING**: Variant order must remain stable for serialization compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataResponse {
    Timeseries(FetchTimeseriesResp),
    MoreData(FetchMoreDataResp),
}

impl DataResponse {
    pub fn status(&self) -> &Status {
        match self {
            DataResponse::Timeseries(resp) => &resp.status,
            DataResponse::MoreData(resp) => &resp.status,
        }
    }
}
