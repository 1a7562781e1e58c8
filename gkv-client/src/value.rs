//! # Decoded Values
//!
//! Purpose: The typed result handed back to callers after a reply has been
//! decoded. `Nil` is the "not found" sentinel; `Bool(false)` is the "false"
//! sentinel used for missing multi-get elements and failed batch positions.

use bytes::Bytes;

use crate::error::DecodeError;

/// Decoded command result.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(Bytes),
    List(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Short tag name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Borrowed payload of a `Str`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Str(data) => Some(&data[..]),
            _ => None,
        }
    }

    /// Looks up a map entry whose key is the string `key`.
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries
                .iter()
                .find(|(name, _)| name.as_bytes() == Some(key))
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn into_int(self) -> Result<i64, DecodeError> {
        match self {
            Value::Int(value) => Ok(value),
            other => Err(DecodeError::shape("integer", other.kind())),
        }
    }

    pub fn into_bool(self) -> Result<bool, DecodeError> {
        match self {
            Value::Bool(value) => Ok(value),
            other => Err(DecodeError::shape("boolean", other.kind())),
        }
    }

    /// Status replies decode to `true`, or to `"OK"` in literal mode.
    pub fn into_ok(self) -> Result<bool, DecodeError> {
        match self {
            Value::Bool(value) => Ok(value),
            Value::Str(text) => Ok(&text[..] == b"OK"),
            other => Err(DecodeError::shape("status", other.kind())),
        }
    }

    pub fn into_f64(self) -> Result<f64, DecodeError> {
        match self {
            Value::Double(value) => Ok(value),
            Value::Int(value) => Ok(value as f64),
            other => Err(DecodeError::shape("double", other.kind())),
        }
    }

    /// `Nil` becomes `None`; scalars become their text form.
    pub fn into_optional_bytes(self) -> Result<Option<Bytes>, DecodeError> {
        match self {
            Value::Nil => Ok(None),
            Value::Str(data) => Ok(Some(data)),
            Value::Int(value) => Ok(Some(Bytes::from(value.to_string()))),
            Value::Double(value) => Ok(Some(Bytes::from(gkv_common::format_float(value)))),
            Value::Bool(value) => Ok(Some(Bytes::from_static(if value { b"1" } else { b"0" }))),
            other => Err(DecodeError::shape("string", other.kind())),
        }
    }

    pub fn into_list(self) -> Result<Vec<Value>, DecodeError> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(DecodeError::shape("list", other.kind())),
        }
    }

    pub fn into_pairs(self) -> Result<Vec<(Value, Value)>, DecodeError> {
        match self {
            Value::Map(entries) => Ok(entries),
            other => Err(DecodeError::shape("map", other.kind())),
        }
    }

    /// Map keyed by field name; keys must be strings or integers.
    pub fn into_field_map(self) -> Result<Vec<(Bytes, Value)>, DecodeError> {
        self.into_pairs()?
            .into_iter()
            .map(|(name, value)| match name {
                Value::Str(name) => Ok((name, value)),
                Value::Int(name) => Ok((Bytes::from(name.to_string()), value)),
                other => Err(DecodeError::shape("field name", other.kind())),
            })
            .collect()
    }
}

impl From<&'static str> for Value {
    fn from(text: &'static str) -> Self {
        Value::Str(Bytes::from_static(text.as_bytes()))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}
