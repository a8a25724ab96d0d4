//! Wire format selection and frame encoding
//!
//! Wire format: `[format_byte][correlation_id (4 bytes BE)][payload]`
//! - format_byte: 0x00 = binary (bincode), 0x01 = compact (postcard)
//! - correlation_id: 4-byte big-endian u32 for request-response matching
//! - payload: serialized message
//!
//! The length prefix is NOT included (handled by transport layer).

use crate::{ProtocolError, Result, MAX_MESSAGE_SIZE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Size of the header preceding every payload
pub const WIRE_HEADER_SIZE: usize = 5;

/// Payload encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WireFormat {
    /// Fixed-width encoding (bincode)
    #[default]
    Binary,
    /// Varint encoding (postcard), used when wire compression is enabled
    Compact,
}

impl WireFormat {
    /// Pick the format matching a compression flag
    pub fn from_compression(enabled: bool) -> Self {
        if enabled {
            WireFormat::Compact
        } else {
            WireFormat::Binary
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            WireFormat::Binary => 0x00,
            WireFormat::Compact => 0x01,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(WireFormat::Binary),
            0x01 => Some(WireFormat::Compact),
            _ => None,
        }
    }
}

/// Serialize a message with the wire header
///
/// # Errors
///
/// Returns [`ProtocolError::MessageTooLarge`] if the frame exceeds
/// [`MAX_MESSAGE_SIZE`].
pub fn encode_frame<T: Serialize>(
    format: WireFormat,
    correlation_id: u32,
    message: &T,
) -> Result<Vec<u8>> {
    let payload = match format {
        WireFormat::Binary => bincode::serialize(message)?,
        WireFormat::Compact => postcard::to_allocvec(message)?,
    };

    let mut frame = Vec::with_capacity(WIRE_HEADER_SIZE + payload.len());
    frame.push(format.as_byte());
    frame.extend_from_slice(&correlation_id.to_be_bytes());
    frame.extend_from_slice(&payload);

    if frame.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge(frame.len(), MAX_MESSAGE_SIZE));
    }
    Ok(frame)
}

/// Deserialize a message, returning it with the detected format and correlation ID
pub fn decode_frame<T: DeserializeOwned>(data: &[u8]) -> Result<(T, WireFormat, u32)> {
    if data.len() < WIRE_HEADER_SIZE {
        return Err(ProtocolError::InvalidFormat(
            "Wire data too short (need format byte + correlation_id)".into(),
        ));
    }

    let format = WireFormat::from_byte(data[0]).ok_or(ProtocolError::UnknownFormat(data[0]))?;
    let correlation_id = u32::from_be_bytes([data[1], data[2], data[3], data[4]]);
    let payload = &data[WIRE_HEADER_SIZE..];

    let message = match format {
        WireFormat::Binary => bincode::deserialize(payload)
            .map_err(|e| ProtocolError::Deserialization(e.to_string()))?,
        WireFormat::Compact => postcard::from_bytes(payload)
            .map_err(|e| ProtocolError::Deserialization(e.to_string()))?,
    };
    Ok((message, format, correlation_id))
}
