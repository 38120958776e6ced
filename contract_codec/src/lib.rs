//! Hand-written transcoding for the lending protocol's fixed contract surface.
//!
//! Call data is built from a static catalogue of function selectors and
//! return data is decoded with per-function layouts. Nothing here knows about
//! RPC transports or business rules.

pub mod calls;
pub mod error;
pub mod returns;
pub mod selectors;
pub mod word;

use alloy::primitives::hex;

pub use error::CodecError;
pub use selectors::{ContractFunction, Selector};

/// `0x`-prefixed lowercase hex
pub fn to_hex_prefixed(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

/// Decode a hex string with or without a `0x` prefix.
pub fn from_hex(data: &str) -> Result<Vec<u8>, CodecError> {
    let stripped = data
        .strip_prefix("0x")
        .or_else(|| data.strip_prefix("0X"))
        .unwrap_or(data);
    hex::decode(stripped).map_err(|e| CodecError::InvalidHex(e.to_string()))
}
