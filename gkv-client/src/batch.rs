//! # Batch Buffer
//!
//! Purpose: Hold commands queued by a transaction or pipeline until they are
//! committed or discarded.
//!
//! ## Design Principles
//! 1. **Owned Entries**: Each `BufferedCommand` owns its argument vector and
//!    decoder; dropping the buffer releases everything exactly once.
//! 2. **Stable Order**: Growth never reorders queued commands; the position
//!    returned by `push` is the position of the reply after commit.
//! 3. **Doubling Growth**: Capacity starts at 16 and doubles when full.

use gkv_common::{ArgumentVector, CommandKind, CommandRef};

use crate::decode::Decoder;

/// Smallest capacity a batch buffer is created with.
pub const MIN_BATCH_CAPACITY: usize = 16;

/// Batch state of a client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchMode {
    /// Commands execute immediately.
    #[default]
    None,
    /// Commands are queued and committed as one atomic transaction.
    Atomic,
    /// Commands are queued and committed as a non-atomic pipeline.
    Pipeline,
}

impl BatchMode {
    pub fn is_batching(self) -> bool {
        self != BatchMode::None
    }
}

/// A command waiting in the batch buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferedCommand {
    kind: CommandKind,
    args: ArgumentVector,
    decoder: Decoder,
}

impl BufferedCommand {
    pub fn new(kind: CommandKind, args: ArgumentVector, decoder: Decoder) -> Self {
        BufferedCommand {
            kind,
            args,
            decoder,
        }
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn args(&self) -> &ArgumentVector {
        &self.args
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Borrowed request handed to the driver.
    pub fn as_request(&self) -> CommandRef<'_> {
        CommandRef {
            kind: self.kind,
            args: &self.args,
        }
    }
}

/// Ordered, growable queue of buffered commands.
#[derive(Debug)]
pub struct BatchBuffer {
    commands: Vec<BufferedCommand>,
}

impl BatchBuffer {
    /// Creates a buffer with at least `MIN_BATCH_CAPACITY` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        BatchBuffer {
            commands: Vec::with_capacity(capacity.max(MIN_BATCH_CAPACITY)),
        }
    }

    /// Queues a command and returns its position.
    pub fn push(&mut self, command: BufferedCommand) -> usize {
        if self.commands.len() == self.commands.capacity() {
            let grow_by = self.commands.capacity().max(MIN_BATCH_CAPACITY);
            self.commands.reserve_exact(grow_by);
        }
        self.commands.push(command);
        self.commands.len() - 1
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.commands.capacity()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BufferedCommand> {
        self.commands.iter()
    }

    /// Borrowed requests in queue order.
    pub fn requests(&self) -> Vec<CommandRef<'_>> {
        self.commands.iter().map(BufferedCommand::as_request).collect()
    }
}

impl Default for BatchBuffer {
    fn default() -> Self {
        BatchBuffer::with_capacity(MIN_BATCH_CAPACITY)
    }
}

impl IntoIterator for BatchBuffer {
    type Item = BufferedCommand;
    type IntoIter = std::vec::IntoIter<BufferedCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}
