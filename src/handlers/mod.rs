//! Tool handlers. Every handler follows the same linear contract:
//! decode the argument map into the tool's typed struct, run its declared
//! validation rules (violations short-circuit before any I/O), make exactly
//! one call on the injected client, and fold the outcome into the response
//! envelope.

pub mod issues;
pub mod pulls;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::mcp;

/// Decode the untyped argument map, turning malformed input into an error
/// envelope instead of a substrate-level failure.
fn decode<T: DeserializeOwned>(args: Value) -> Result<T, Value> {
    serde_json::from_value(args)
        .map_err(|e| mcp::tool_error(format!("invalid arguments: {}", e)))
}

/// Narrow validated pagination values to the client contract. `limit` is
/// already clamped to [1, 100]; an offset past u32::MAX saturates.
fn page_args(limit: i64, offset: i64) -> (u32, u32) {
    (limit as u32, u32::try_from(offset).unwrap_or(u32::MAX))
}
