//! JSON framing helpers.
//!
//! One frame = one JSON text message. Websocket text frames keep the
//! protocol inspectable from browser devtools; a binary codec can be
//! swapped in behind these two functions without touching callers.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Serializes a command or event into a JSON string.
pub fn encode<T: Serialize>(value: &T) -> Result<String, ProtocolError> {
    serde_json::to_string(value).map_err(ProtocolError::Encode)
}

/// Parses one received frame.
pub fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T, ProtocolError> {
    serde_json::from_slice(data).map_err(ProtocolError::Decode)
}
