// gkv-common - Shared command and response model for GlideKV
//
// This crate defines the vocabulary exchanged between the client core and a
// store driver: command kinds, argument vectors, raw responses, routes and the
// driver contract itself.

pub mod command;
pub mod driver;
pub mod error;
pub mod response;
pub mod types;

// Re-export for convenience
pub use command::*;
pub use driver::*;
pub use error::*;
pub use response::*;
pub use types::*;
