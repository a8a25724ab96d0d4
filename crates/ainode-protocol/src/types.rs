//! Endpoint and tabular data types for protocol transport

use crate::ProtocolError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A reachable node, identified by host and port
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// Hostname or IP address
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl Endpoint {
    /// Create a new endpoint
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Get the address string (host:port)
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s
            .trim()
            .rsplit_once(':')
            .ok_or_else(|| ProtocolError::InvalidFormat(format!("missing port in '{}'", s)))?;
        if host.is_empty() {
            return Err(ProtocolError::InvalidFormat(format!(
                "missing host in '{}'",
                s
            )));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| ProtocolError::InvalidFormat(format!("invalid port in '{}'", s)))?;
        Ok(Self::new(host, port))
    }
}

/// Declared type of a result column
///
/// Cells are decoded according to this tag, never by inspecting their content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Boolean,
    Int32,
    Int64,
    Float,
    Double,
    Text,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Boolean => "BOOLEAN",
            TypeTag::Int32 => "INT32",
            TypeTag::Int64 => "INT64",
            TypeTag::Float => "FLOAT",
            TypeTag::Double => "DOUBLE",
            TypeTag::Text => "TEXT",
        }
    }

    /// Encoded width in bytes, `None` for variable-length types
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            TypeTag::Boolean => Some(1),
            TypeTag::Int32 | TypeTag::Float => Some(4),
            TypeTag::Int64 | TypeTag::Double => Some(8),
            TypeTag::Text => None,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BOOLEAN" => Ok(TypeTag::Boolean),
            "INT32" => Ok(TypeTag::Int32),
            "INT64" => Ok(TypeTag::Int64),
            "FLOAT" => Ok(TypeTag::Float),
            "DOUBLE" => Ok(TypeTag::Double),
            "TEXT" => Ok(TypeTag::Text),
            _ => Err(ProtocolError::InvalidFormat(format!(
                "unknown column type: {}",
                s
            ))),
        }
    }
}

/// One row of a result page as sent by the data node
///
/// `cells` are big-endian encodings of each column's value; the position of a
/// column's cell is given by the query's column index map. `None` is a null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// Row timestamp in milliseconds since epoch
    pub timestamp: i64,
    pub cells: Vec<Option<Bytes>>,
}

impl RawRow {
    pub fn new(timestamp: i64, cells: Vec<Option<Bytes>>) -> Self {
        Self { timestamp, cells }
    }
}
