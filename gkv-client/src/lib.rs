//! # GlideKV Client Core
//!
//! Purpose: Marshal structured command calls into argument vectors, run them
//! through a pluggable driver either immediately or as part of a transaction
//! or pipeline, and decode the tagged replies into typed values.
//!
//! ## Design Principles
//! 1. **Table-Driven Commands**: Each command is one table entry naming its
//!    grammar, reply shape and batch policy.
//! 2. **Owned Buffers**: Argument bytes are owned by whoever holds the command,
//!    so release happens exactly once through `Drop`.
//! 3. **Typed Decoders**: Decoders carry their own context instead of untyped
//!    side data.
//! 4. **Driver Agnostic**: Transport, routing and retries live behind the
//!    `Driver` trait.

mod args;
mod batch;
mod client;
mod config;
mod decode;
mod error;
mod hash;
mod keyspace;
mod marshal;
mod table;
mod value;

pub use args::{CommandArgs, Condition, Expiry, ExpiryUnit, FieldValues, Increment};
pub use batch::{BatchBuffer, BatchMode, BufferedCommand, MIN_BATCH_CAPACITY};
pub use client::{KvClient, Reply};
pub use config::{ClientConfig, ConfigError};
pub use decode::{convert, DecodeOptions, Decoder};
pub use error::{ClientError, ClientResult, DecodeError, MarshalError};
pub use hash::FieldMap;
pub use keyspace::FlushMode;
pub use marshal::{compose, MarshalResult};
pub use table::{spec, BatchPolicy, CommandSpec, Grammar, ReplyShape};
pub use value::Value;

pub use gkv_common::{
    ArgValue, ArgumentVector, CommandKind, CommandRef, Connect, Driver, DriverError, DriverResult,
    RawResponse, Route,
};
