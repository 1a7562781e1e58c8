//! # Client Handle
//!
//! Purpose: The logical connection. Owns the driver, the batch state and the
//! batch buffer, and routes every command either straight to the driver or
//! into the buffer.
//!
//! ## Design Principles
//! 1. **Table-Driven Dispatch**: One `dispatch` path serves every command; the
//!    command table supplies the grammar, decoder and batch policy.
//! 2. **Explicit State Machine**: `None -> Atomic | Pipeline -> None`, leaving
//!    a batch only through `commit` or `discard`.
//! 3. **Fail Without Side Effects**: Marshaling and state errors leave the
//!    buffer and mode untouched; driver errors on commit clear the batch.
//! 4. **Single Owner**: The client is driven by one caller at a time and does
//!    no internal locking.
//!
//! ## State Machine
//!
//! ```text
//!            begin_transaction            commit / discard
//!   None ---------------------> Atomic ------------------> None
//!     \      begin_pipeline               commit / discard
//!      ---------------------> Pipeline ------------------> None
//! ```

use gkv_common::{CommandKind, Connect, Driver, Route};
use tracing::{debug, warn};

use crate::args::CommandArgs;
use crate::batch::{BatchBuffer, BatchMode, BufferedCommand};
use crate::config::ClientConfig;
use crate::decode::{DecodeOptions, Decoder};
use crate::error::{ClientError, ClientResult, DecodeError};
use crate::marshal;
use crate::table;
use crate::value::Value;

/// Outcome of a per-command call.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    /// The command executed and its reply was decoded.
    Value(T),
    /// The command was queued at this batch position.
    Queued(usize),
}

impl<T> Reply<T> {
    /// The decoded value, or `None` when queued.
    pub fn value(self) -> Option<T> {
        match self {
            Reply::Value(value) => Some(value),
            Reply::Queued(_) => None,
        }
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, Reply::Queued(_))
    }

    pub(crate) fn try_map<U>(
        self,
        kind: CommandKind,
        convert: impl FnOnce(T) -> Result<U, DecodeError>,
    ) -> ClientResult<Reply<U>> {
        match self {
            Reply::Value(value) => convert(value).map(Reply::Value).map_err(|source| {
                ClientError::Decode {
                    command: kind.name(),
                    source,
                }
            }),
            Reply::Queued(position) => Ok(Reply::Queued(position)),
        }
    }
}

/// Client handle over a driver connection.
#[derive(Debug)]
pub struct KvClient<D: Driver> {
    driver: D,
    config: ClientConfig,
    mode: BatchMode,
    buffer: Option<BatchBuffer>,
    database_id: Option<i64>,
    closed: bool,
}

impl<D: Driver> KvClient<D> {
    /// Wraps an open driver connection.
    pub fn new(driver: D, config: ClientConfig) -> Self {
        let database_id = config.database_id;
        KvClient {
            driver,
            config,
            mode: BatchMode::None,
            buffer: None,
            database_id,
            closed: false,
        }
    }

    /// Opens a driver connection and wraps it.
    pub fn open(options: &<D as Connect>::Options, config: ClientConfig) -> ClientResult<Self>
    where
        D: Connect,
    {
        let driver = D::open(options)?;
        Ok(Self::new(driver, config))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Current batch state.
    pub fn batch_mode(&self) -> BatchMode {
        self.mode
    }

    /// Number of commands waiting in the batch buffer.
    pub fn queued(&self) -> usize {
        self.buffer.as_ref().map_or(0, BatchBuffer::len)
    }

    /// Logical database selected on this connection, when known.
    pub fn database_id(&self) -> Option<i64> {
        self.database_id
    }

    /// Starts an atomic transaction. No-op when already batching.
    pub fn begin_transaction(&mut self) -> &mut Self {
        self.begin(BatchMode::Atomic)
    }

    /// Starts a non-atomic pipeline. No-op when already batching.
    pub fn begin_pipeline(&mut self) -> &mut Self {
        self.begin(BatchMode::Pipeline)
    }

    fn begin(&mut self, mode: BatchMode) -> &mut Self {
        if self.mode.is_batching() {
            debug!(current = ?self.mode, requested = ?mode, "already batching");
            return self;
        }
        self.mode = mode;
        debug!(mode = ?mode, client = self.client_name(), "batch started");
        self
    }

    /// Drops every queued command and leaves the batch.
    pub fn discard(&mut self) -> ClientResult<()> {
        if !self.mode.is_batching() {
            return Err(ClientError::NotBatching);
        }
        let dropped = self.take_batch().map_or(0, |buffer| buffer.len());
        debug!(dropped, client = self.client_name(), "batch discarded");
        Ok(())
    }

    /// Sends every queued command as one batch and decodes the replies in
    /// queue order. A reply that fails to decode becomes `Value::Bool(false)`.
    pub fn commit(&mut self) -> ClientResult<Vec<Value>> {
        let atomic = match self.mode {
            BatchMode::None => return Err(ClientError::NotBatching),
            BatchMode::Atomic => true,
            BatchMode::Pipeline => false,
        };
        if self.queued() == 0 {
            return Err(ClientError::EmptyBatch);
        }
        let buffer = match self.take_batch() {
            Some(buffer) => buffer,
            None => return Err(ClientError::EmptyBatch),
        };
        let expected = buffer.len();

        let responses = match self.driver.execute_batch(&buffer.requests(), atomic) {
            Ok(responses) => responses,
            Err(err) => {
                warn!(error = %err, commands = expected, atomic, "batch failed");
                return Err(err.into());
            }
        };
        if responses.len() != expected {
            warn!(expected, actual = responses.len(), "batch reply count mismatch");
            return Err(ClientError::BatchLengthMismatch {
                expected,
                actual: responses.len(),
            });
        }

        let options = self.decode_options();
        let results = buffer
            .into_iter()
            .zip(responses.iter())
            .enumerate()
            .map(|(position, (command, raw))| {
                match command.decoder().decode(raw, options) {
                    Ok(value) => value,
                    Err(err) => {
                        warn!(
                            position,
                            command = %command.kind(),
                            error = %err,
                            "batched reply failed to decode"
                        );
                        Value::Bool(false)
                    }
                }
            })
            .collect();
        debug!(commands = expected, atomic, "batch committed");
        Ok(results)
    }

    /// Marshals and dispatches one command through the command table.
    pub fn dispatch(&mut self, kind: CommandKind, args: CommandArgs) -> ClientResult<Reply<Value>> {
        self.dispatch_routed(kind, args, None)
    }

    /// Like `dispatch`, sending direct calls to `route` when one is given.
    /// Queued commands carry no route.
    pub fn dispatch_routed(
        &mut self,
        kind: CommandKind,
        args: CommandArgs,
        route: Option<&Route>,
    ) -> ClientResult<Reply<Value>> {
        let entry = table::spec(kind);
        let batching = self.mode.is_batching();
        if batching && !entry.batch.permits(self.config.cluster_mode) {
            return Err(ClientError::NotAllowedInBatch {
                command: kind.name(),
            });
        }

        let argv = marshal::compose(entry.grammar, &args).map_err(|source| ClientError::Marshal {
            command: kind.name(),
            source,
        })?;
        let decoder = Decoder::for_reply(entry.reply, &args);

        if batching {
            let capacity = self.config.effective_batch_capacity();
            let buffer = self
                .buffer
                .get_or_insert_with(|| BatchBuffer::with_capacity(capacity));
            let position = buffer.push(BufferedCommand::new(kind, argv, decoder));
            debug!(command = %kind, position, "command queued");
            return Ok(Reply::Queued(position));
        }

        debug!(command = %kind, args = argv.len(), routed = route.is_some(), "executing command");
        let raw = match route {
            Some(route) => self.driver.execute_with_route(kind, &argv, route)?,
            None => self.driver.execute(kind, &argv)?,
        };
        let value = decoder
            .decode(&raw, self.decode_options())
            .map_err(|source| ClientError::Decode {
                command: kind.name(),
                source,
            })?;
        Ok(Reply::Value(value))
    }

    /// Queues one command and hands the client back for chaining:
    /// `client.queue(a, x)?.queue(b, y)?.commit()`. Outside a batch nothing is
    /// sent and `NotBatching` is returned.
    pub fn queue(&mut self, kind: CommandKind, args: CommandArgs) -> ClientResult<&mut Self> {
        if !self.mode.is_batching() {
            return Err(ClientError::NotBatching);
        }
        self.dispatch(kind, args)?;
        Ok(self)
    }

    /// Closes the driver connection, discarding any queued commands.
    pub fn close(mut self) {
        self.shutdown();
    }

    pub(crate) fn set_database_id(&mut self, database_id: i64) {
        self.database_id = Some(database_id);
    }

    fn take_batch(&mut self) -> Option<BatchBuffer> {
        self.mode = BatchMode::None;
        self.buffer.take()
    }

    fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            reply_literal: self.config.reply_literal,
        }
    }

    fn client_name(&self) -> &str {
        self.config.client_name.as_deref().unwrap_or("-")
    }

    fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Some(buffer) = self.take_batch() {
            debug!(dropped = buffer.len(), "discarding queued commands on close");
        }
        self.driver.close();
    }
}

impl<D: Driver> Drop for KvClient<D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
