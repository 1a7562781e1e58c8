//! # Command Arguments
//!
//! Purpose: The structured form of a command request before marshaling.
//! `CommandArgs` is a superset of every command's operands; the grammar
//! chosen by the command table decides which slots are read.

use bytes::Bytes;
use gkv_common::ArgValue;

/// Write condition tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Only when no expiration / field / key exists yet.
    Nx,
    /// Only when it already exists.
    Xx,
    /// Only when the new expiration is greater.
    Gt,
    /// Only when the new expiration is less.
    Lt,
}

impl Condition {
    /// Unprefixed token, as used by HEXPIRE and SET.
    pub const fn token(self) -> &'static str {
        match self {
            Condition::Nx => "NX",
            Condition::Xx => "XX",
            Condition::Gt => "GT",
            Condition::Lt => "LT",
        }
    }

    /// Field-prefixed token used by HSETEX, when the family supports it.
    pub const fn field_token(self) -> Option<&'static str> {
        match self {
            Condition::Nx => Some("FNX"),
            Condition::Xx => Some("FXX"),
            Condition::Gt | Condition::Lt => None,
        }
    }
}

/// Unit of an expiration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryUnit {
    Seconds,
    Milliseconds,
    UnixSeconds,
    UnixMilliseconds,
}

impl ExpiryUnit {
    pub const fn token(self) -> &'static str {
        match self {
            ExpiryUnit::Seconds => "EX",
            ExpiryUnit::Milliseconds => "PX",
            ExpiryUnit::UnixSeconds => "EXAT",
            ExpiryUnit::UnixMilliseconds => "PXAT",
        }
    }
}

/// Expiration clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// A relative or absolute deadline.
    In(ExpiryUnit, i64),
    /// Keep the current expiration (SET, HSETEX).
    KeepTtl,
    /// Remove the expiration (HGETEX).
    Persist,
}

impl Expiry {
    pub const fn seconds(value: i64) -> Self {
        Expiry::In(ExpiryUnit::Seconds, value)
    }

    pub const fn milliseconds(value: i64) -> Self {
        Expiry::In(ExpiryUnit::Milliseconds, value)
    }

    pub const fn unix_seconds(value: i64) -> Self {
        Expiry::In(ExpiryUnit::UnixSeconds, value)
    }

    pub const fn unix_milliseconds(value: i64) -> Self {
        Expiry::In(ExpiryUnit::UnixMilliseconds, value)
    }

    pub(crate) const fn option_name(self) -> &'static str {
        match self {
            Expiry::In(unit, _) => unit.token(),
            Expiry::KeepTtl => "KEEPTTL",
            Expiry::Persist => "PERSIST",
        }
    }
}

/// Counter delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Increment {
    Int(i64),
    Float(f64),
}

/// Field/value operands in either accepted call shape.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValues {
    /// Variadic form: `field, value, field, value, ...`.
    Flat(Vec<ArgValue>),
    /// Associative form.
    Map(Vec<(ArgValue, ArgValue)>),
}

impl Default for FieldValues {
    fn default() -> Self {
        FieldValues::Flat(Vec::new())
    }
}

/// Structured operands of one command request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandArgs {
    pub key: Option<Bytes>,
    pub keys: Vec<Bytes>,
    pub destination: Option<Bytes>,
    pub database: Option<i64>,
    pub field: Option<ArgValue>,
    pub value: Option<ArgValue>,
    pub fields: Vec<ArgValue>,
    pub pairs: FieldValues,
    pub increment: Option<Increment>,
    pub count: Option<i64>,
    pub with_values: bool,
    pub expiry: Option<Expiry>,
    pub condition: Option<Condition>,
    pub integers: Vec<i64>,
    pub flags: Vec<&'static str>,
    pub raw: Vec<ArgValue>,
}

impl CommandArgs {
    pub fn new() -> Self {
        CommandArgs::default()
    }

    /// Starts a request addressed to `key`.
    pub fn for_key(key: &[u8]) -> Self {
        CommandArgs::new().key(key)
    }

    pub fn key(mut self, key: &[u8]) -> Self {
        self.key = Some(Bytes::copy_from_slice(key));
        self
    }

    pub fn keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        self.keys = keys
            .into_iter()
            .map(|key| Bytes::copy_from_slice(key.as_ref()))
            .collect();
        self
    }

    /// Target key of COPY.
    pub fn destination(mut self, key: &[u8]) -> Self {
        self.destination = Some(Bytes::copy_from_slice(key));
        self
    }

    pub fn database(mut self, database_id: i64) -> Self {
        self.database = Some(database_id);
        self
    }

    pub fn field(mut self, field: impl Into<ArgValue>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn value(mut self, value: impl Into<ArgValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<ArgValue>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Variadic `field, value, ...` operands.
    pub fn flat_pairs<I, V>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ArgValue>,
    {
        self.pairs = FieldValues::Flat(items.into_iter().map(Into::into).collect());
        self
    }

    /// Associative `(field, value)` operands.
    pub fn map<I, F, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (F, V)>,
        F: Into<ArgValue>,
        V: Into<ArgValue>,
    {
        self.pairs = FieldValues::Map(
            entries
                .into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        );
        self
    }

    pub fn increment(mut self, increment: Increment) -> Self {
        self.increment = Some(increment);
        self
    }

    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_values(mut self, with_values: bool) -> Self {
        self.with_values = with_values;
        self
    }

    pub fn expiry(mut self, expiry: Option<Expiry>) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn condition(mut self, condition: Option<Condition>) -> Self {
        self.condition = condition;
        self
    }

    pub fn integer(mut self, value: i64) -> Self {
        self.integers.push(value);
        self
    }

    pub fn flag(mut self, token: &'static str) -> Self {
        self.flags.push(token);
        self
    }

    pub fn raw<I, V>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ArgValue>,
    {
        self.raw = tokens.into_iter().map(Into::into).collect();
        self
    }
}
