//! AINode Wire Protocol
//!
//! This crate defines the message types exchanged between an AINode worker and
//! the two services it talks to:
//!
//! - the **config node** cluster (membership and node registration), see
//!   [`ConfigRequest`] / [`ConfigResponse`]
//! - a **data node** serving paginated time-series query results, see
//!   [`DataRequest`] / [`DataResponse`]
//!
//! Messages are framed as `[length][format_byte][correlation_id][payload]`.
//! The length prefix belongs to the transport; everything after it is produced
//! by [`encode_frame`] and consumed by [`decode_frame`].
//!
//! # Protocol Stability
//!
//! The enum variant order is significant for both bincode and postcard
//! serialization. Changes to variant order break wire compatibility.
//!
//! # Example
//!
//! ```rust
//! use ainode_protocol::{decode_frame, encode_frame, DataRequest, WireFormat};
//!
//! let request = DataRequest::FetchMoreData { query_id: 7, fetch_size: 1024 };
//! let frame = encode_frame(WireFormat::Compact, 1, &request).unwrap();
//! let (decoded, format, correlation_id): (DataRequest, _, _) = decode_frame(&frame).unwrap();
//! assert_eq!(decoded, request);
//! assert_eq!(format, WireFormat::Compact);
//! assert_eq!(correlation_id, 1);
//! ```

mod error;
mod messages;
mod node;
mod status;
mod types;
mod wire;

pub use error::{ProtocolError, Result};
pub use messages::{
    ConfigRequest, ConfigResponse, DataRequest, DataResponse, FetchMoreDataResp,
    FetchTimeseriesResp, NodeRegisterReq, NodeRestartReq,
};
pub use node::{NodeConfiguration, NodeId, NodeLocation, NodeResource, NodeVersionInfo};
pub use status::{Status, StatusCode};
pub use types::{Endpoint, RawRow, TypeTag};
pub use wire::{decode_frame, encode_frame, WireFormat, WIRE_HEADER_SIZE};

/// Maximum message size (64 MiB)
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;
