//! # Client Errors
//!
//! Purpose: One error enum per failure layer, folded into `ClientError` at the
//! public boundary.
//!
//! ## Layers
//! 1. **Marshaling**: structured input cannot form a valid command. Nothing
//!    was sent and the batch buffer is untouched.
//! 2. **Driver**: the driver reported a transport or command failure.
//! 3. **Decoding**: the reply did not have the shape the command expects.
//! 4. **Protocol state**: commit/discard outside a batch, empty commits,
//!    commands that may not be queued.

use gkv_common::DriverError;
use thiserror::Error;

/// Result type for the client.
pub type ClientResult<T> = Result<T, ClientError>;

/// Structured input could not be turned into an argument vector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarshalError {
    #[error("key is required")]
    MissingKey,
    #[error("field name is required")]
    MissingField,
    #[error("value is required")]
    MissingValue,
    #[error("at least one field is required")]
    EmptyFields,
    #[error("at least one key is required")]
    EmptyKeys,
    #[error("destination key is required")]
    MissingDestination,
    #[error("database id {database_id} is negative")]
    NegativeDatabase { database_id: i64 },
    #[error("at least one field/value pair is required")]
    EmptyPairs,
    #[error("field/value list has odd length {len}")]
    OddPairs { len: usize },
    #[error("increment is required")]
    MissingIncrement,
    #[error("float increment {value} is not finite")]
    NonFiniteIncrement { value: f64 },
    #[error("expiration is required")]
    MissingExpiry,
    #[error("expiration option {option} is not supported here")]
    UnsupportedExpiry { option: &'static str },
    #[error("condition {condition} is not supported here")]
    UnsupportedCondition { condition: &'static str },
    #[error("integer operand is required")]
    MissingInteger,
    #[error("command word is required")]
    EmptyCommand,
}

/// A reply did not match the shape its decoder expects.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("expected {expected} reply, got {actual}")]
    Shape {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("server error: {message}")]
    Server { message: String },
    #[error("pair array has odd length {len}")]
    OddPairs { len: usize },
    #[error("reply {text:?} is not a valid float")]
    Float { text: String },
}

impl DecodeError {
    pub(crate) fn shape(expected: &'static str, actual: &'static str) -> Self {
        DecodeError::Shape { expected, actual }
    }
}

/// Errors surfaced by `KvClient`.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid arguments for {command}: {source}")]
    Marshal {
        command: &'static str,
        source: MarshalError,
    },
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error("failed to decode {command} reply: {source}")]
    Decode {
        command: &'static str,
        source: DecodeError,
    },
    #[error("not in a transaction or pipeline")]
    NotBatching,
    #[error("no commands queued")]
    EmptyBatch,
    #[error("{command} is not allowed inside a transaction or pipeline")]
    NotAllowedInBatch { command: &'static str },
    #[error("batch returned {actual} replies for {expected} commands")]
    BatchLengthMismatch { expected: usize, actual: usize },
}
