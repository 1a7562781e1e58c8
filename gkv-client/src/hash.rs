//! # Hash Commands
//!
//! Typed entry points for hash keys. Each method builds `CommandArgs`, runs
//! the shared dispatch path and converts the decoded value. While batching,
//! every method returns `Reply::Queued` with the command's batch position.

use bytes::Bytes;
use gkv_common::{ArgValue, CommandKind, Driver};

use crate::args::{CommandArgs, Condition, Expiry, ExpiryUnit, Increment};
use crate::client::{KvClient, Reply};
use crate::error::ClientResult;
use crate::value::Value;

/// Field name to value, in request order.
pub type FieldMap = Vec<(Bytes, Value)>;

impl<D: Driver> KvClient<D> {
    /// HLEN: number of fields in the hash.
    pub fn hlen(&mut self, key: &[u8]) -> ClientResult<Reply<i64>> {
        self.dispatch(CommandKind::HLen, CommandArgs::for_key(key))?
            .try_map(CommandKind::HLen, Value::into_int)
    }

    /// HKEYS: every field name.
    pub fn hkeys(&mut self, key: &[u8]) -> ClientResult<Reply<Vec<Value>>> {
        self.dispatch(CommandKind::HKeys, CommandArgs::for_key(key))?
            .try_map(CommandKind::HKeys, Value::into_list)
    }

    /// HVALS: every field value.
    pub fn hvals(&mut self, key: &[u8]) -> ClientResult<Reply<Vec<Value>>> {
        self.dispatch(CommandKind::HVals, CommandArgs::for_key(key))?
            .try_map(CommandKind::HVals, Value::into_list)
    }

    /// HGETALL: every field and value.
    pub fn hgetall(&mut self, key: &[u8]) -> ClientResult<Reply<Vec<(Value, Value)>>> {
        self.dispatch(CommandKind::HGetAll, CommandArgs::for_key(key))?
            .try_map(CommandKind::HGetAll, Value::into_pairs)
    }

    /// HGET. Returns `None` when the field or key is missing.
    pub fn hget(
        &mut self,
        key: &[u8],
        field: impl Into<ArgValue>,
    ) -> ClientResult<Reply<Option<Bytes>>> {
        let args = CommandArgs::for_key(key).field(field);
        self.dispatch(CommandKind::HGet, args)?
            .try_map(CommandKind::HGet, Value::into_optional_bytes)
    }

    /// HEXISTS.
    pub fn hexists(&mut self, key: &[u8], field: impl Into<ArgValue>) -> ClientResult<Reply<bool>> {
        let args = CommandArgs::for_key(key).field(field);
        self.dispatch(CommandKind::HExists, args)?
            .try_map(CommandKind::HExists, Value::into_bool)
    }

    /// HSTRLEN.
    pub fn hstrlen(&mut self, key: &[u8], field: impl Into<ArgValue>) -> ClientResult<Reply<i64>> {
        let args = CommandArgs::for_key(key).field(field);
        self.dispatch(CommandKind::HStrLen, args)?
            .try_map(CommandKind::HStrLen, Value::into_int)
    }

    /// HSETNX. Returns true when the field was created.
    pub fn hsetnx(
        &mut self,
        key: &[u8],
        field: impl Into<ArgValue>,
        value: impl Into<ArgValue>,
    ) -> ClientResult<Reply<bool>> {
        let args = CommandArgs::for_key(key).field(field).value(value);
        self.dispatch(CommandKind::HSetNx, args)?
            .try_map(CommandKind::HSetNx, Value::into_bool)
    }

    /// HDEL. Returns the number of removed fields.
    pub fn hdel<I, F>(&mut self, key: &[u8], fields: I) -> ClientResult<Reply<i64>>
    where
        I: IntoIterator<Item = F>,
        F: Into<ArgValue>,
    {
        let args = CommandArgs::for_key(key).fields(fields);
        self.dispatch(CommandKind::HDel, args)?
            .try_map(CommandKind::HDel, Value::into_int)
    }

    /// HMGET. Blank field names (empty, null, `false`) are skipped; missing
    /// fields map to `Value::Bool(false)`.
    pub fn hmget<I, F>(&mut self, key: &[u8], fields: I) -> ClientResult<Reply<FieldMap>>
    where
        I: IntoIterator<Item = F>,
        F: Into<ArgValue>,
    {
        let fields = fields.into_iter().filter_map(|field| {
            let field: ArgValue = field.into();
            (!field.is_blank()).then_some(field)
        });
        let args = CommandArgs::for_key(key).fields(fields);
        self.dispatch(CommandKind::HMGet, args)?
            .try_map(CommandKind::HMGet, Value::into_field_map)
    }

    /// HSET with variadic `field, value, ...` operands. Returns the number of
    /// new fields.
    pub fn hset<I, V>(&mut self, key: &[u8], field_values: I) -> ClientResult<Reply<i64>>
    where
        I: IntoIterator<Item = V>,
        V: Into<ArgValue>,
    {
        let args = CommandArgs::for_key(key).flat_pairs(field_values);
        self.dispatch(CommandKind::HSet, args)?
            .try_map(CommandKind::HSet, Value::into_int)
    }

    /// HSET with associative operands.
    pub fn hset_map<I, F, V>(&mut self, key: &[u8], entries: I) -> ClientResult<Reply<i64>>
    where
        I: IntoIterator<Item = (F, V)>,
        F: Into<ArgValue>,
        V: Into<ArgValue>,
    {
        let args = CommandArgs::for_key(key).map(entries);
        self.dispatch(CommandKind::HSet, args)?
            .try_map(CommandKind::HSet, Value::into_int)
    }

    /// HMSET.
    pub fn hmset<I, F, V>(&mut self, key: &[u8], entries: I) -> ClientResult<Reply<bool>>
    where
        I: IntoIterator<Item = (F, V)>,
        F: Into<ArgValue>,
        V: Into<ArgValue>,
    {
        let args = CommandArgs::for_key(key).map(entries);
        self.dispatch(CommandKind::HMSet, args)?
            .try_map(CommandKind::HMSet, Value::into_ok)
    }

    /// HINCRBY. Returns the new value.
    pub fn hincrby(
        &mut self,
        key: &[u8],
        field: impl Into<ArgValue>,
        delta: i64,
    ) -> ClientResult<Reply<i64>> {
        let args = CommandArgs::for_key(key)
            .field(field)
            .increment(Increment::Int(delta));
        self.dispatch(CommandKind::HIncrBy, args)?
            .try_map(CommandKind::HIncrBy, Value::into_int)
    }

    /// HINCRBYFLOAT. Returns the new value.
    pub fn hincrbyfloat(
        &mut self,
        key: &[u8],
        field: impl Into<ArgValue>,
        delta: f64,
    ) -> ClientResult<Reply<f64>> {
        let args = CommandArgs::for_key(key)
            .field(field)
            .increment(Increment::Float(delta));
        self.dispatch(CommandKind::HIncrByFloat, args)?
            .try_map(CommandKind::HIncrByFloat, Value::into_f64)
    }

    /// HRANDFIELD. A single field comes back as `Value::Str`, several as
    /// `Value::List`, and with values as `Value::Map`; an empty hash yields
    /// `Value::Nil` or `Value::Bool(false)`.
    pub fn hrandfield(
        &mut self,
        key: &[u8],
        count: Option<i64>,
        with_values: bool,
    ) -> ClientResult<Reply<Value>> {
        let mut args = CommandArgs::for_key(key).with_values(with_values);
        if let Some(count) = count {
            args = args.count(count);
        }
        self.dispatch(CommandKind::HRandField, args)
    }

    /// HSETEX: sets fields and their expiration together. `condition` accepts
    /// NX or XX, sent as FNX / FXX.
    pub fn hsetex<I, F, V>(
        &mut self,
        key: &[u8],
        entries: I,
        expiry: Option<Expiry>,
        condition: Option<Condition>,
    ) -> ClientResult<Reply<i64>>
    where
        I: IntoIterator<Item = (F, V)>,
        F: Into<ArgValue>,
        V: Into<ArgValue>,
    {
        let args = CommandArgs::for_key(key)
            .map(entries)
            .expiry(expiry)
            .condition(condition);
        self.dispatch(CommandKind::HSetEx, args)?
            .try_map(CommandKind::HSetEx, Value::into_int)
    }

    /// HEXPIRE / HPEXPIRE / HEXPIREAT / HPEXPIREAT, chosen by `unit`.
    /// Returns one status code per field.
    pub fn hexpire_in<I, F>(
        &mut self,
        key: &[u8],
        unit: ExpiryUnit,
        value: i64,
        condition: Option<Condition>,
        fields: I,
    ) -> ClientResult<Reply<Vec<Value>>>
    where
        I: IntoIterator<Item = F>,
        F: Into<ArgValue>,
    {
        let kind = match unit {
            ExpiryUnit::Seconds => CommandKind::HExpire,
            ExpiryUnit::Milliseconds => CommandKind::HPExpire,
            ExpiryUnit::UnixSeconds => CommandKind::HExpireAt,
            ExpiryUnit::UnixMilliseconds => CommandKind::HPExpireAt,
        };
        let args = CommandArgs::for_key(key)
            .expiry(Some(Expiry::In(unit, value)))
            .condition(condition)
            .fields(fields);
        self.dispatch(kind, args)?.try_map(kind, Value::into_list)
    }

    /// HEXPIRE.
    pub fn hexpire<I, F>(
        &mut self,
        key: &[u8],
        seconds: i64,
        condition: Option<Condition>,
        fields: I,
    ) -> ClientResult<Reply<Vec<Value>>>
    where
        I: IntoIterator<Item = F>,
        F: Into<ArgValue>,
    {
        self.hexpire_in(key, ExpiryUnit::Seconds, seconds, condition, fields)
    }

    /// HPEXPIRE.
    pub fn hpexpire<I, F>(
        &mut self,
        key: &[u8],
        milliseconds: i64,
        condition: Option<Condition>,
        fields: I,
    ) -> ClientResult<Reply<Vec<Value>>>
    where
        I: IntoIterator<Item = F>,
        F: Into<ArgValue>,
    {
        self.hexpire_in(key, ExpiryUnit::Milliseconds, milliseconds, condition, fields)
    }

    /// HEXPIREAT.
    pub fn hexpireat<I, F>(
        &mut self,
        key: &[u8],
        unix_seconds: i64,
        condition: Option<Condition>,
        fields: I,
    ) -> ClientResult<Reply<Vec<Value>>>
    where
        I: IntoIterator<Item = F>,
        F: Into<ArgValue>,
    {
        self.hexpire_in(key, ExpiryUnit::UnixSeconds, unix_seconds, condition, fields)
    }

    /// HPEXPIREAT.
    pub fn hpexpireat<I, F>(
        &mut self,
        key: &[u8],
        unix_milliseconds: i64,
        condition: Option<Condition>,
        fields: I,
    ) -> ClientResult<Reply<Vec<Value>>>
    where
        I: IntoIterator<Item = F>,
        F: Into<ArgValue>,
    {
        self.hexpire_in(
            key,
            ExpiryUnit::UnixMilliseconds,
            unix_milliseconds,
            condition,
            fields,
        )
    }

    fn field_query<I, F>(
        &mut self,
        kind: CommandKind,
        key: &[u8],
        fields: I,
    ) -> ClientResult<Reply<Vec<Value>>>
    where
        I: IntoIterator<Item = F>,
        F: Into<ArgValue>,
    {
        let args = CommandArgs::for_key(key).fields(fields);
        self.dispatch(kind, args)?.try_map(kind, Value::into_list)
    }

    /// HTTL: remaining seconds per field.
    pub fn httl<I, F>(&mut self, key: &[u8], fields: I) -> ClientResult<Reply<Vec<Value>>>
    where
        I: IntoIterator<Item = F>,
        F: Into<ArgValue>,
    {
        self.field_query(CommandKind::HTtl, key, fields)
    }

    /// HPTTL: remaining milliseconds per field.
    pub fn hpttl<I, F>(&mut self, key: &[u8], fields: I) -> ClientResult<Reply<Vec<Value>>>
    where
        I: IntoIterator<Item = F>,
        F: Into<ArgValue>,
    {
        self.field_query(CommandKind::HPTtl, key, fields)
    }

    /// HEXPIRETIME: absolute expiration per field, in seconds.
    pub fn hexpiretime<I, F>(&mut self, key: &[u8], fields: I) -> ClientResult<Reply<Vec<Value>>>
    where
        I: IntoIterator<Item = F>,
        F: Into<ArgValue>,
    {
        self.field_query(CommandKind::HExpireTime, key, fields)
    }

    /// HPEXPIRETIME: absolute expiration per field, in milliseconds.
    pub fn hpexpiretime<I, F>(&mut self, key: &[u8], fields: I) -> ClientResult<Reply<Vec<Value>>>
    where
        I: IntoIterator<Item = F>,
        F: Into<ArgValue>,
    {
        self.field_query(CommandKind::HPExpireTime, key, fields)
    }

    /// HPERSIST.
    pub fn hpersist<I, F>(&mut self, key: &[u8], fields: I) -> ClientResult<Reply<Vec<Value>>>
    where
        I: IntoIterator<Item = F>,
        F: Into<ArgValue>,
    {
        self.field_query(CommandKind::HPersist, key, fields)
    }

    /// HGETEX: reads fields and optionally changes their expiration.
    pub fn hgetex<I, F>(
        &mut self,
        key: &[u8],
        fields: I,
        expiry: Option<Expiry>,
    ) -> ClientResult<Reply<FieldMap>>
    where
        I: IntoIterator<Item = F>,
        F: Into<ArgValue>,
    {
        let args = CommandArgs::for_key(key).fields(fields).expiry(expiry);
        self.dispatch(CommandKind::HGetEx, args)?
            .try_map(CommandKind::HGetEx, Value::into_field_map)
    }
}
