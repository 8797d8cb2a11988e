//! Payload codec (§4.5.1, §9 Open Question #4): `postcard` over `serde`,
//! chosen for backward-compatible field addition without an external
//! `protoc` toolchain dependency.

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::EncodeError;

/// Encode a payload with the project's binary codec.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, EncodeError> {
    postcard::to_allocvec(value).map_err(|e| EncodeError {
        reason: e.to_string(),
    })
}

/// Decode a payload previously produced by [`encode`]. Callers attach
/// component/event-type context via [`crate::parser::parse`]; this function
/// only wraps the raw codec error.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, postcard::Error> {
    postcard::from_bytes(bytes)
}
