// error.rs - failures reported by a store driver

use thiserror::Error;

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors surfaced by a driver while opening, executing or closing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// The store rejected the command or batch.
    #[error("command failed: {message}")]
    Command { message: String },
    /// Transport failure or connection setup failure.
    #[error("connection error: {reason}")]
    Connection { reason: String },
    /// The connection was already closed.
    #[error("connection closed")]
    Closed,
}

impl DriverError {
    /// Convenience constructor for command-level failures.
    pub fn command(message: impl Into<String>) -> Self {
        DriverError::Command {
            message: message.into(),
        }
    }

    /// Convenience constructor for transport failures.
    pub fn connection(reason: impl Into<String>) -> Self {
        DriverError::Connection {
            reason: reason.into(),
        }
    }
}
