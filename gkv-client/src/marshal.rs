//! # Argument Marshaler
//!
//! Purpose: Compose the flat argument vector of a command from its structured
//! operands, following the store's grammar for that command.
//!
//! ## Design Principles
//! 1. **Pure Functions**: No I/O and no client state; the same input always
//!    yields the same tokens.
//! 2. **Validate, Then Emit**: Every check that can fail runs before the
//!    vector escapes, so a failed call never leaves a partial command behind.
//! 3. **Owned Output**: Every dynamic token is rendered into owned bytes; fixed
//!    keywords are static.
//! 4. **Token Order Is Grammar**: Clauses are emitted in the exact order the
//!    store requires, never reordered for convenience.

use gkv_common::{
    format_float, ArgValue, ArgumentVector, TOKEN_DB, TOKEN_FIELDS, TOKEN_KEEPTTL, TOKEN_PERSIST,
    TOKEN_WITHVALUES,
};

use crate::args::{CommandArgs, Condition, Expiry, FieldValues, Increment};
use crate::error::MarshalError;
use crate::table::Grammar;

/// Result of one marshaling call.
pub type MarshalResult = Result<ArgumentVector, MarshalError>;

/// Composes the argument vector for `args` according to `grammar`.
pub fn compose(grammar: Grammar, args: &CommandArgs) -> MarshalResult {
    match grammar {
        Grammar::KeyOnly => key_only(args),
        Grammar::SingleField => single_field(args),
        Grammar::FieldValue => field_value(args),
        Grammar::MultiField => multi_field(args),
        Grammar::SetPairs => set_pairs(args),
        Grammar::Increment => increment(args),
        Grammar::RandomField => random_field(args),
        Grammar::FieldExpirySet => field_expiry_set(args),
        Grammar::FieldExpire => field_expire(args),
        Grammar::FieldQuery => field_query(args),
        Grammar::GetWithExpiry => get_with_expiry(args),
        Grammar::KeyValue => key_value(args),
        Grammar::Keys => keys(args),
        Grammar::KeyMembers => key_members(args),
        Grammar::Copy => copy(args),
        Grammar::KeyInteger => key_integer(args),
        Grammar::KeyPairs => key_pairs(args),
        Grammar::Integers => integers(args),
        Grammar::Flags => flags(args),
        Grammar::OptionalMessage => optional_message(args),
        Grammar::Empty => Ok(ArgumentVector::new()),
        Grammar::Raw => raw(args),
    }
}

fn require_key(args: &CommandArgs) -> Result<&[u8], MarshalError> {
    args.key.as_deref().ok_or(MarshalError::MissingKey)
}

fn require_field(args: &CommandArgs) -> Result<&ArgValue, MarshalError> {
    args.field.as_ref().ok_or(MarshalError::MissingField)
}

fn require_value(args: &CommandArgs) -> Result<&ArgValue, MarshalError> {
    args.value.as_ref().ok_or(MarshalError::MissingValue)
}

fn require_fields(args: &CommandArgs) -> Result<&[ArgValue], MarshalError> {
    if args.fields.is_empty() {
        return Err(MarshalError::EmptyFields);
    }
    Ok(&args.fields)
}

/// Number of field/value pairs, rejecting empty and odd-length inputs.
fn pair_count(pairs: &FieldValues) -> Result<usize, MarshalError> {
    match pairs {
        FieldValues::Flat(items) if items.is_empty() => Err(MarshalError::EmptyPairs),
        FieldValues::Flat(items) if items.len() % 2 != 0 => {
            Err(MarshalError::OddPairs { len: items.len() })
        }
        FieldValues::Flat(items) => Ok(items.len() / 2),
        FieldValues::Map(entries) if entries.is_empty() => Err(MarshalError::EmptyPairs),
        FieldValues::Map(entries) => Ok(entries.len()),
    }
}

fn push_pairs(argv: &mut ArgumentVector, pairs: &FieldValues) {
    match pairs {
        FieldValues::Flat(items) => {
            for item in items {
                argv.push_value(item);
            }
        }
        FieldValues::Map(entries) => {
            for (field, value) in entries {
                argv.push_value(field);
                argv.push_value(value);
            }
        }
    }
}

fn push_field_block(argv: &mut ArgumentVector, fields: &[ArgValue]) {
    argv.push_token(TOKEN_FIELDS);
    argv.push_int(fields.len() as i64);
    for field in fields {
        argv.push_value(field);
    }
}

fn plain_condition(condition: Condition) -> Result<&'static str, MarshalError> {
    match condition {
        Condition::Nx | Condition::Xx => Ok(condition.token()),
        Condition::Gt | Condition::Lt => Err(MarshalError::UnsupportedCondition {
            condition: condition.token(),
        }),
    }
}

fn key_only(args: &CommandArgs) -> MarshalResult {
    let key = require_key(args)?;
    let mut argv = ArgumentVector::with_capacity(1);
    argv.push_bytes(key);
    Ok(argv)
}

fn single_field(args: &CommandArgs) -> MarshalResult {
    let key = require_key(args)?;
    let field = require_field(args)?;
    let mut argv = ArgumentVector::with_capacity(2);
    argv.push_bytes(key);
    argv.push_value(field);
    Ok(argv)
}

fn field_value(args: &CommandArgs) -> MarshalResult {
    let key = require_key(args)?;
    let field = require_field(args)?;
    let value = require_value(args)?;
    let mut argv = ArgumentVector::with_capacity(3);
    argv.push_bytes(key);
    argv.push_value(field);
    argv.push_value(value);
    Ok(argv)
}

fn multi_field(args: &CommandArgs) -> MarshalResult {
    let key = require_key(args)?;
    let fields = require_fields(args)?;
    let mut argv = ArgumentVector::with_capacity(1 + fields.len());
    argv.push_bytes(key);
    for field in fields {
        argv.push_value(field);
    }
    Ok(argv)
}

fn set_pairs(args: &CommandArgs) -> MarshalResult {
    let key = require_key(args)?;
    let count = pair_count(&args.pairs)?;
    let mut argv = ArgumentVector::with_capacity(1 + count * 2);
    argv.push_bytes(key);
    push_pairs(&mut argv, &args.pairs);
    Ok(argv)
}

fn increment(args: &CommandArgs) -> MarshalResult {
    let key = require_key(args)?;
    let field = require_field(args)?;
    let delta = args.increment.ok_or(MarshalError::MissingIncrement)?;
    let mut argv = ArgumentVector::with_capacity(3);
    argv.push_bytes(key);
    argv.push_value(field);
    match delta {
        Increment::Int(delta) => argv.push_int(delta),
        Increment::Float(delta) if !delta.is_finite() => {
            return Err(MarshalError::NonFiniteIncrement { value: delta });
        }
        Increment::Float(delta) => argv.push_bytes(format_float(delta).as_bytes()),
    }
    Ok(argv)
}

fn random_field(args: &CommandArgs) -> MarshalResult {
    let key = require_key(args)?;
    let count = args.count.unwrap_or(1);
    let mut argv = ArgumentVector::with_capacity(3);
    argv.push_bytes(key);
    // WITHVALUES is only valid after an explicit count.
    if args.with_values || count != 1 {
        argv.push_int(count);
    }
    if args.with_values {
        argv.push_token(TOKEN_WITHVALUES);
    }
    Ok(argv)
}

fn field_expiry_set(args: &CommandArgs) -> MarshalResult {
    let key = require_key(args)?;
    let count = pair_count(&args.pairs)?;
    let condition = match args.condition {
        Some(condition) => Some(condition.field_token().ok_or(
            MarshalError::UnsupportedCondition {
                condition: condition.token(),
            },
        )?),
        None => None,
    };
    if let Some(Expiry::Persist) = args.expiry {
        return Err(MarshalError::UnsupportedExpiry {
            option: Expiry::Persist.option_name(),
        });
    }

    let mut argv = ArgumentVector::with_capacity(6 + count * 2);
    argv.push_bytes(key);
    if let Some(token) = condition {
        argv.push_token(token);
    }
    match args.expiry {
        Some(Expiry::In(unit, value)) if value > 0 => {
            argv.push_token(unit.token());
            argv.push_int(value);
        }
        Some(Expiry::KeepTtl) => argv.push_token(TOKEN_KEEPTTL),
        _ => {}
    }
    argv.push_token(TOKEN_FIELDS);
    argv.push_int(count as i64);
    push_pairs(&mut argv, &args.pairs);
    Ok(argv)
}

fn field_expire(args: &CommandArgs) -> MarshalResult {
    let key = require_key(args)?;
    let value = match args.expiry {
        Some(Expiry::In(_, value)) => value,
        Some(other) => {
            return Err(MarshalError::UnsupportedExpiry {
                option: other.option_name(),
            })
        }
        None => return Err(MarshalError::MissingExpiry),
    };
    let fields = require_fields(args)?;

    let mut argv = ArgumentVector::with_capacity(5 + fields.len());
    argv.push_bytes(key);
    argv.push_int(value);
    if let Some(condition) = args.condition {
        argv.push_token(condition.token());
    }
    push_field_block(&mut argv, fields);
    Ok(argv)
}

fn field_query(args: &CommandArgs) -> MarshalResult {
    let key = require_key(args)?;
    let fields = require_fields(args)?;
    let mut argv = ArgumentVector::with_capacity(3 + fields.len());
    argv.push_bytes(key);
    push_field_block(&mut argv, fields);
    Ok(argv)
}

fn get_with_expiry(args: &CommandArgs) -> MarshalResult {
    let key = require_key(args)?;
    if let Some(Expiry::KeepTtl) = args.expiry {
        return Err(MarshalError::UnsupportedExpiry {
            option: Expiry::KeepTtl.option_name(),
        });
    }
    let fields = require_fields(args)?;

    let mut argv = ArgumentVector::with_capacity(5 + fields.len());
    argv.push_bytes(key);
    match args.expiry {
        Some(Expiry::In(unit, value)) if value > 0 => {
            argv.push_token(unit.token());
            argv.push_int(value);
        }
        Some(Expiry::Persist) => argv.push_token(TOKEN_PERSIST),
        _ => {}
    }
    push_field_block(&mut argv, fields);
    Ok(argv)
}

fn key_value(args: &CommandArgs) -> MarshalResult {
    let key = require_key(args)?;
    let value = require_value(args)?;
    let condition = args.condition.map(plain_condition).transpose()?;
    if let Some(Expiry::Persist) = args.expiry {
        return Err(MarshalError::UnsupportedExpiry {
            option: Expiry::Persist.option_name(),
        });
    }

    let mut argv = ArgumentVector::with_capacity(5);
    argv.push_bytes(key);
    argv.push_value(value);
    if let Some(token) = condition {
        argv.push_token(token);
    }
    match args.expiry {
        Some(Expiry::In(unit, value)) if value > 0 => {
            argv.push_token(unit.token());
            argv.push_int(value);
        }
        Some(Expiry::KeepTtl) => argv.push_token(TOKEN_KEEPTTL),
        _ => {}
    }
    Ok(argv)
}

fn keys(args: &CommandArgs) -> MarshalResult {
    if args.keys.is_empty() {
        return Err(MarshalError::EmptyKeys);
    }
    let mut argv = ArgumentVector::with_capacity(args.keys.len());
    for key in &args.keys {
        argv.push_bytes(key);
    }
    Ok(argv)
}

fn key_members(args: &CommandArgs) -> MarshalResult {
    let key = require_key(args)?;
    let mut argv = ArgumentVector::with_capacity(1 + args.fields.len());
    argv.push_bytes(key);
    for member in &args.fields {
        argv.push_value(member);
    }
    Ok(argv)
}

fn copy(args: &CommandArgs) -> MarshalResult {
    let source = require_key(args)?;
    let destination = args
        .destination
        .as_deref()
        .ok_or(MarshalError::MissingDestination)?;
    if let Some(database_id) = args.database.filter(|id| *id < 0) {
        return Err(MarshalError::NegativeDatabase { database_id });
    }

    let mut argv = ArgumentVector::with_capacity(5);
    argv.push_bytes(source);
    argv.push_bytes(destination);
    if let Some(database_id) = args.database {
        argv.push_token(TOKEN_DB);
        argv.push_int(database_id);
    }
    for &flag in &args.flags {
        argv.push_token(flag);
    }
    Ok(argv)
}

fn key_integer(args: &CommandArgs) -> MarshalResult {
    let key = require_key(args)?;
    let value = args
        .integers
        .first()
        .copied()
        .ok_or(MarshalError::MissingInteger)?;
    let mut argv = ArgumentVector::with_capacity(2);
    argv.push_bytes(key);
    argv.push_int(value);
    Ok(argv)
}

fn key_pairs(args: &CommandArgs) -> MarshalResult {
    let count = pair_count(&args.pairs)?;
    let mut argv = ArgumentVector::with_capacity(count * 2);
    push_pairs(&mut argv, &args.pairs);
    Ok(argv)
}

fn integers(args: &CommandArgs) -> MarshalResult {
    if args.integers.is_empty() {
        return Err(MarshalError::MissingInteger);
    }
    let mut argv = ArgumentVector::with_capacity(args.integers.len());
    for value in &args.integers {
        argv.push_int(*value);
    }
    Ok(argv)
}

fn flags(args: &CommandArgs) -> MarshalResult {
    let mut argv = ArgumentVector::with_capacity(args.flags.len());
    for &flag in &args.flags {
        argv.push_token(flag);
    }
    Ok(argv)
}

fn optional_message(args: &CommandArgs) -> MarshalResult {
    let mut argv = ArgumentVector::with_capacity(1);
    if let Some(message) = &args.value {
        argv.push_value(message);
    }
    Ok(argv)
}

fn raw(args: &CommandArgs) -> MarshalResult {
    if args.raw.is_empty() {
        return Err(MarshalError::EmptyCommand);
    }
    let mut argv = ArgumentVector::with_capacity(args.raw.len());
    for token in &args.raw {
        argv.push_value(token);
    }
    Ok(argv)
}
