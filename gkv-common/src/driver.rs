//! # Driver Contract
//!
//! Purpose: Describe the store client the GlideKV core delegates to. A driver
//! owns transport, routing and retries; the core only hands it marshaled
//! argument vectors and reads back tagged responses.
//!
//! ## Design Principles
//! 1. **Synchronous Contract**: Every call blocks until the driver answers.
//! 2. **Borrowed Arguments**: Drivers read argument vectors; they never take
//!    ownership of buffered commands.
//! 3. **Ordered Batches**: `execute_batch` answers with one response per
//!    request, in request order.

use bytes::Bytes;

use crate::command::CommandKind;
use crate::error::DriverResult;
use crate::response::RawResponse;
use crate::types::ArgumentVector;

/// Explicit placement of a command in a clustered deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Every primary node.
    AllPrimaries,
    /// Every node, primaries and replicas.
    AllNodes,
    /// Any single node.
    RandomNode,
    /// The primary owning the slot of `key`.
    SlotKey(Bytes),
    /// A specific node.
    Address { host: String, port: u16 },
}

/// One command of a batch, borrowed from the client's buffer.
#[derive(Debug, Clone, Copy)]
pub struct CommandRef<'a> {
    pub kind: CommandKind,
    pub args: &'a ArgumentVector,
}

/// Store client consumed by the GlideKV core.
pub trait Driver {
    /// Executes one command.
    fn execute(&mut self, kind: CommandKind, args: &ArgumentVector) -> DriverResult<RawResponse>;

    /// Executes one command on an explicitly chosen node set.
    fn execute_with_route(
        &mut self,
        kind: CommandKind,
        args: &ArgumentVector,
        route: &Route,
    ) -> DriverResult<RawResponse>;

    /// Executes an ordered batch, atomically when `atomic` is true.
    ///
    /// On success the result holds exactly one response per command.
    fn execute_batch(
        &mut self,
        commands: &[CommandRef<'_>],
        atomic: bool,
    ) -> DriverResult<Vec<RawResponse>>;

    /// Releases the underlying connection.
    fn close(&mut self);
}

/// Drivers that know how to establish their own connection.
pub trait Connect: Driver + Sized {
    /// Driver-specific connection settings.
    type Options;

    /// Opens a connection.
    fn open(options: &Self::Options) -> DriverResult<Self>;
}

impl<D: Driver + ?Sized> Driver for Box<D> {
    fn execute(&mut self, kind: CommandKind, args: &ArgumentVector) -> DriverResult<RawResponse> {
        (**self).execute(kind, args)
    }

    fn execute_with_route(
        &mut self,
        kind: CommandKind,
        args: &ArgumentVector,
        route: &Route,
    ) -> DriverResult<RawResponse> {
        (**self).execute_with_route(kind, args, route)
    }

    fn execute_batch(
        &mut self,
        commands: &[CommandRef<'_>],
        atomic: bool,
    ) -> DriverResult<Vec<RawResponse>> {
        (**self).execute_batch(commands, atomic)
    }

    fn close(&mut self) {
        (**self).close()
    }
}
