//! # Result Decoder Registry
//!
//! Purpose: Turn a driver's `RawResponse` into a typed `Value` according to
//! the reply shape a command declares.
//!
//! ## Design Principles
//! 1. **Tagged Decoders**: A `Decoder` carries its own context (e.g. the
//!    requested field list), so buffered commands keep everything they need to
//!    decode later without side tables.
//! 2. **All or Nothing**: A decoder either returns a complete value or an
//!    error; it never hands back a half-built result.
//! 3. **Errors Are Values Too**: An `Error` reply in place of a value is a
//!    decode failure carrying the server message.

use bytes::Bytes;
use gkv_common::RawResponse;
use tracing::warn;

use crate::args::CommandArgs;
use crate::error::DecodeError;
use crate::table::ReplyShape;
use crate::value::Value;

/// Client-wide decoding switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Render `OK` status replies as the string `"OK"` instead of `true`.
    pub reply_literal: bool,
}

/// Decoder for one command reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoder {
    Integer,
    Boolean,
    String,
    List,
    Map,
    Ok,
    Float,
    /// Field names in request order.
    MultiGet { fields: Vec<Bytes> },
    /// Field names in request order.
    FieldExpiryGet { fields: Vec<Bytes> },
    RandomField { with_values: bool },
    Any,
}

impl Decoder {
    /// Builds the decoder for `shape`, capturing any context from `args`.
    pub fn for_reply(shape: ReplyShape, args: &CommandArgs) -> Self {
        match shape {
            ReplyShape::Integer => Decoder::Integer,
            ReplyShape::Boolean => Decoder::Boolean,
            ReplyShape::String => Decoder::String,
            ReplyShape::List => Decoder::List,
            ReplyShape::Map => Decoder::Map,
            ReplyShape::Ok => Decoder::Ok,
            ReplyShape::Float => Decoder::Float,
            ReplyShape::MultiGet => Decoder::MultiGet {
                fields: render_fields(args),
            },
            ReplyShape::FieldExpiryGet => Decoder::FieldExpiryGet {
                fields: render_fields(args),
            },
            ReplyShape::RandomField => Decoder::RandomField {
                with_values: args.with_values,
            },
            ReplyShape::Any => Decoder::Any,
        }
    }

    /// Decodes one reply.
    pub fn decode(&self, raw: &RawResponse, options: DecodeOptions) -> Result<Value, DecodeError> {
        match self {
            Decoder::Integer => match raw {
                RawResponse::Int(value) => Ok(Value::Int(*value)),
                other => Err(mismatch("integer", other)),
            },
            Decoder::Boolean => match raw {
                RawResponse::Bool(value) => Ok(Value::Bool(*value)),
                other => Err(mismatch("boolean", other)),
            },
            Decoder::String => match raw {
                RawResponse::Null => Ok(Value::Nil),
                RawResponse::Array(_) | RawResponse::Map(_) => Err(mismatch("string", raw)),
                other => convert(other, options),
            },
            Decoder::List => match raw {
                RawResponse::Array(items) => convert_all(items, options).map(Value::List),
                other => Err(mismatch("array", other)),
            },
            Decoder::Map => decode_pairs(raw, options),
            Decoder::Ok => Ok(match raw {
                RawResponse::Ok => ok_value(options),
                _ => Value::Bool(false),
            }),
            Decoder::Float => decode_float(raw),
            Decoder::MultiGet { fields } => decode_multi_get(fields, raw),
            Decoder::FieldExpiryGet { fields } => decode_field_expiry_get(fields, raw, options),
            Decoder::RandomField { with_values } => match raw {
                RawResponse::Null => Ok(Value::Nil),
                RawResponse::Array(items) if items.is_empty() => Ok(Value::Bool(false)),
                _ if *with_values => decode_pairs(raw, options),
                other => convert(other, options),
            },
            Decoder::Any => convert(raw, options),
        }
    }
}

/// General converter: maps every tag to its natural `Value`.
pub fn convert(raw: &RawResponse, options: DecodeOptions) -> Result<Value, DecodeError> {
    match raw {
        RawResponse::Int(value) => Ok(Value::Int(*value)),
        RawResponse::Double(value) => Ok(Value::Double(*value)),
        RawResponse::String(data) => Ok(Value::Str(data.clone())),
        RawResponse::Bool(value) => Ok(Value::Bool(*value)),
        RawResponse::Ok => Ok(ok_value(options)),
        RawResponse::Null => Ok(Value::Nil),
        RawResponse::Array(items) => convert_all(items, options).map(Value::List),
        RawResponse::Map(entries) => entries
            .iter()
            .map(|(key, value)| Ok((convert(key, options)?, convert(value, options)?)))
            .collect::<Result<Vec<_>, DecodeError>>()
            .map(Value::Map),
        RawResponse::Error(message) => Err(DecodeError::Server {
            message: message.clone(),
        }),
    }
}

fn convert_all(items: &[RawResponse], options: DecodeOptions) -> Result<Vec<Value>, DecodeError> {
    items.iter().map(|item| convert(item, options)).collect()
}

fn ok_value(options: DecodeOptions) -> Value {
    if options.reply_literal {
        Value::Str(Bytes::from_static(b"OK"))
    } else {
        Value::Bool(true)
    }
}

fn mismatch(expected: &'static str, raw: &RawResponse) -> DecodeError {
    match raw {
        RawResponse::Error(message) => DecodeError::Server {
            message: message.clone(),
        },
        other => DecodeError::shape(expected, other.kind()),
    }
}

fn render_fields(args: &CommandArgs) -> Vec<Bytes> {
    args.fields.iter().map(|field| field.render()).collect()
}

/// `Map`, or an `Array` of alternating keys and values.
fn decode_pairs(raw: &RawResponse, options: DecodeOptions) -> Result<Value, DecodeError> {
    match raw {
        RawResponse::Map(_) => convert(raw, options),
        RawResponse::Array(items) if items.len() % 2 != 0 => {
            Err(DecodeError::OddPairs { len: items.len() })
        }
        RawResponse::Array(items) => items
            .chunks_exact(2)
            .map(|pair| Ok((convert(&pair[0], options)?, convert(&pair[1], options)?)))
            .collect::<Result<Vec<_>, DecodeError>>()
            .map(Value::Map),
        other => Err(mismatch("map", other)),
    }
}

fn decode_float(raw: &RawResponse) -> Result<Value, DecodeError> {
    match raw {
        RawResponse::Double(value) => Ok(Value::Double(*value)),
        RawResponse::Int(value) => Ok(Value::Double(*value as f64)),
        RawResponse::String(text) => std::str::from_utf8(text)
            .ok()
            .and_then(|text| text.trim().parse::<f64>().ok())
            .map(Value::Double)
            .ok_or_else(|| DecodeError::Float {
                text: String::from_utf8_lossy(text).into_owned(),
            }),
        other => Err(mismatch("double", other)),
    }
}

/// Pairs each requested field with the reply element at the same position.
fn decode_multi_get(fields: &[Bytes], raw: &RawResponse) -> Result<Value, DecodeError> {
    let items = match raw {
        RawResponse::Array(items) => items,
        other => return Err(mismatch("array", other)),
    };
    if items.len() < fields.len() {
        warn!(
            requested = fields.len(),
            received = items.len(),
            "multi-get reply shorter than field list, trailing fields left unmapped"
        );
    }
    let entries = fields
        .iter()
        .zip(items)
        .map(|(field, item)| {
            let value = match item {
                RawResponse::String(data) => Value::Str(data.clone()),
                RawResponse::Null => Value::Bool(false),
                _ => Value::Nil,
            };
            (Value::Str(field.clone()), value)
        })
        .collect();
    Ok(Value::Map(entries))
}

fn decode_field_expiry_get(
    fields: &[Bytes],
    raw: &RawResponse,
    options: DecodeOptions,
) -> Result<Value, DecodeError> {
    let items = match raw {
        RawResponse::Array(items) => items,
        other => return Err(mismatch("array", other)),
    };
    if items.len() < fields.len() {
        warn!(
            requested = fields.len(),
            received = items.len(),
            "HGETEX reply shorter than field list, trailing fields left unmapped"
        );
    }
    fields
        .iter()
        .zip(items)
        .map(|(field, item)| Ok((Value::Str(field.clone()), convert(item, options)?)))
        .collect::<Result<Vec<_>, DecodeError>>()
        .map(Value::Map)
}
