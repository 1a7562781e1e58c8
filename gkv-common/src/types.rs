//! # Argument Types
//!
//! Operand and argument-vector types for building store commands.
//!
//! ## Design Principles
//!
//! 1. **Owned Arguments**: Every argument in an `ArgumentVector` is an owned
//!    `Bytes` produced at marshaling time; nothing borrows from caller memory.
//! 2. **Parallel Lengths by Construction**: Lengths are derived from the
//!    arguments themselves, so `args` and `lengths` can never disagree.
//! 3. **Canonical Rendering**: Numbers and booleans are rendered to their
//!    decimal text form exactly once, in `ArgValue::render`.
//! 4. **No Null Entries**: Absent values render as zero-length arguments.
//!
//! ## Rendering Table
//!
//! ```text
//! ArgValue::Bytes(b"abc") -> "abc"
//! ArgValue::Int(-42)      -> "-42"
//! ArgValue::Float(1.5)    -> "1.5"
//! ArgValue::Float(10.0)   -> "10"
//! ArgValue::Bool(true)    -> "1"
//! ArgValue::Bool(false)   -> "0"
//! ArgValue::Null          -> ""
//! ```

use std::fmt;

use bytes::Bytes;

/// A single heterogeneous command operand before stringification.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Raw bytes or text.
    Bytes(Bytes),
    /// Signed integer, rendered as canonical decimal.
    Int(i64),
    /// Float, rendered as the shortest round-trip decimal.
    Float(f64),
    /// Boolean, rendered as `"1"` or `"0"`.
    Bool(bool),
    /// Absent value, rendered as the empty string.
    Null,
}

impl ArgValue {
    /// Renders the operand into a freshly owned byte string.
    pub fn render(&self) -> Bytes {
        match self {
            ArgValue::Bytes(data) => Bytes::copy_from_slice(data),
            ArgValue::Int(value) => Bytes::from(value.to_string()),
            ArgValue::Float(value) => Bytes::from(format_float(*value)),
            ArgValue::Bool(true) => Bytes::from_static(b"1"),
            ArgValue::Bool(false) => Bytes::from_static(b"0"),
            ArgValue::Null => Bytes::new(),
        }
    }

    /// True for operands that cannot name a field: null, `false`, or empty bytes.
    pub fn is_blank(&self) -> bool {
        match self {
            ArgValue::Null | ArgValue::Bool(false) => true,
            ArgValue::Bytes(data) => data.is_empty(),
            _ => false,
        }
    }
}

/// Canonical decimal rendering for float operands.
pub fn format_float(value: f64) -> String {
    // `Display` for f64 already yields the shortest representation that
    // parses back to the same value, without exponent notation.
    format!("{}", value)
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Bytes(Bytes::copy_from_slice(value.as_bytes()))
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Bytes(Bytes::from(value))
    }
}

impl From<&[u8]> for ArgValue {
    fn from(value: &[u8]) -> Self {
        ArgValue::Bytes(Bytes::copy_from_slice(value))
    }
}

impl<const N: usize> From<&[u8; N]> for ArgValue {
    fn from(value: &[u8; N]) -> Self {
        ArgValue::Bytes(Bytes::copy_from_slice(value))
    }
}

impl From<Vec<u8>> for ArgValue {
    fn from(value: Vec<u8>) -> Self {
        ArgValue::Bytes(Bytes::from(value))
    }
}

impl From<Bytes> for ArgValue {
    fn from(value: Bytes) -> Self {
        ArgValue::Bytes(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Int(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        ArgValue::Int(i64::from(value))
    }
}

impl From<u32> for ArgValue {
    fn from(value: u32) -> Self {
        ArgValue::Int(i64::from(value))
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Float(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl<T: Into<ArgValue>> From<Option<T>> for ArgValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ArgValue::Null, Into::into)
    }
}

/// Flat, ordered argument list for one command, excluding the command word.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ArgumentVector {
    args: Vec<Bytes>,
}

impl ArgumentVector {
    /// Creates an empty vector.
    pub fn new() -> Self {
        ArgumentVector { args: Vec::new() }
    }

    /// Creates an empty vector with room for `capacity` arguments.
    pub fn with_capacity(capacity: usize) -> Self {
        ArgumentVector {
            args: Vec::with_capacity(capacity),
        }
    }

    /// Appends a fixed keyword token without allocating.
    pub fn push_token(&mut self, token: &'static str) {
        self.args.push(Bytes::from_static(token.as_bytes()));
    }

    /// Appends a copy of `data`.
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.args.push(Bytes::copy_from_slice(data));
    }

    /// Appends the canonical decimal form of `value`.
    pub fn push_int(&mut self, value: i64) {
        self.args.push(Bytes::from(value.to_string()));
    }

    /// Appends the rendered form of a heterogeneous operand.
    pub fn push_value(&mut self, value: &ArgValue) {
        self.args.push(value.render());
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// True when no arguments are present.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Byte length of each argument, parallel to `iter()`.
    pub fn lengths(&self) -> Vec<usize> {
        self.args.iter().map(Bytes::len).collect()
    }

    /// Returns the argument at `index`.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.args.get(index).map(|arg| arg.as_ref())
    }

    /// Iterates over the arguments in order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.args.iter().map(|arg| arg.as_ref())
    }

    /// Borrowed view of every argument, e.g. for a RESP encoder.
    pub fn as_slices(&self) -> Vec<&[u8]> {
        self.iter().collect()
    }

    /// Lossy UTF-8 rendering of every argument, for logs and assertions.
    pub fn to_strings_lossy(&self) -> Vec<String> {
        self.iter()
            .map(|arg| String::from_utf8_lossy(arg).into_owned())
            .collect()
    }

    /// Consumes the vector and returns the owned arguments.
    pub fn into_inner(self) -> Vec<Bytes> {
        self.args
    }
}

impl fmt::Debug for ArgumentVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_strings_lossy()).finish()
    }
}
