//! # Raw Responses
//!
//! Purpose: Model the tagged reply a driver hands back for one command,
//! independent of the wire protocol that produced it.
//!
//! ## Design Principles
//! 1. **Closed Set of Shapes**: Every reply is one of nine tags; decoders
//!    match on the tag instead of probing types.
//! 2. **Read-Only to the Client**: The client core only inspects responses.
//! 3. **Cheap Clones**: String payloads are `Bytes`.

use bytes::Bytes;

/// Tagged reply produced by a driver.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    Int(i64),
    Double(f64),
    String(Bytes),
    Bool(bool),
    Array(Vec<RawResponse>),
    Map(Vec<(RawResponse, RawResponse)>),
    /// Status reply `OK`.
    Ok,
    /// Absent value (missing key or field).
    Null,
    /// Error reply carried in place of a value.
    Error(String),
}

impl RawResponse {
    /// Builds a string reply from a copy of `data`.
    pub fn bulk(data: &[u8]) -> Self {
        RawResponse::String(Bytes::copy_from_slice(data))
    }

    /// Short tag name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RawResponse::Int(_) => "integer",
            RawResponse::Double(_) => "double",
            RawResponse::String(_) => "string",
            RawResponse::Bool(_) => "boolean",
            RawResponse::Array(_) => "array",
            RawResponse::Map(_) => "map",
            RawResponse::Ok => "ok",
            RawResponse::Null => "null",
            RawResponse::Error(_) => "error",
        }
    }

    /// True for `Array` and `Map`.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, RawResponse::Array(_) | RawResponse::Map(_))
    }
}
