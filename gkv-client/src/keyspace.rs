//! # Keyspace and Server Commands
//!
//! Typed entry points for plain keys and connection-level operations. SELECT
//! and WATCH are never queued; FLUSHDB, FLUSHALL, TIME and DBSIZE are not
//! queued on cluster deployments. The database-wide commands accept an
//! optional `Route`.

use bytes::Bytes;
use gkv_common::{ArgValue, CommandKind, Driver, Route, TOKEN_ASYNC, TOKEN_REPLACE, TOKEN_SYNC};

use crate::args::{CommandArgs, Condition, Expiry};
use crate::client::{KvClient, Reply};
use crate::error::ClientResult;
use crate::value::Value;

/// Flush behaviour for FLUSHDB / FLUSHALL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlushMode {
    /// Server default.
    #[default]
    Default,
    Sync,
    Async,
}

impl FlushMode {
    fn token(self) -> Option<&'static str> {
        match self {
            FlushMode::Default => None,
            FlushMode::Sync => Some(TOKEN_SYNC),
            FlushMode::Async => Some(TOKEN_ASYNC),
        }
    }
}

impl<D: Driver> KvClient<D> {
    /// GET. Returns `None` when the key is missing.
    pub fn get(&mut self, key: &[u8]) -> ClientResult<Reply<Option<Bytes>>> {
        self.dispatch(CommandKind::Get, CommandArgs::for_key(key))?
            .try_map(CommandKind::Get, Value::into_optional_bytes)
    }

    /// SET without options.
    pub fn set(&mut self, key: &[u8], value: impl Into<ArgValue>) -> ClientResult<Reply<bool>> {
        self.set_with(key, value, None, None)
    }

    /// SET with an optional NX/XX condition and expiration. Returns false
    /// when the condition prevented the write.
    pub fn set_with(
        &mut self,
        key: &[u8],
        value: impl Into<ArgValue>,
        condition: Option<Condition>,
        expiry: Option<Expiry>,
    ) -> ClientResult<Reply<bool>> {
        let args = CommandArgs::for_key(key)
            .value(value)
            .condition(condition)
            .expiry(expiry);
        self.dispatch(CommandKind::Set, args)?
            .try_map(CommandKind::Set, Value::into_ok)
    }

    /// DEL. Returns the number of removed keys.
    pub fn del<I, K>(&mut self, keys: I) -> ClientResult<Reply<i64>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        self.dispatch(CommandKind::Del, CommandArgs::new().keys(keys))?
            .try_map(CommandKind::Del, Value::into_int)
    }

    /// EXISTS. Returns how many of the keys exist.
    pub fn exists<I, K>(&mut self, keys: I) -> ClientResult<Reply<i64>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        self.dispatch(CommandKind::Exists, CommandArgs::new().keys(keys))?
            .try_map(CommandKind::Exists, Value::into_int)
    }

    /// INCR.
    pub fn incr(&mut self, key: &[u8]) -> ClientResult<Reply<i64>> {
        self.dispatch(CommandKind::Incr, CommandArgs::for_key(key))?
            .try_map(CommandKind::Incr, Value::into_int)
    }

    /// INCRBY.
    pub fn incr_by(&mut self, key: &[u8], delta: i64) -> ClientResult<Reply<i64>> {
        let args = CommandArgs::for_key(key).integer(delta);
        self.dispatch(CommandKind::IncrBy, args)?
            .try_map(CommandKind::IncrBy, Value::into_int)
    }

    /// TTL in seconds; -1 without expiration, -2 when missing.
    pub fn ttl(&mut self, key: &[u8]) -> ClientResult<Reply<i64>> {
        self.dispatch(CommandKind::Ttl, CommandArgs::for_key(key))?
            .try_map(CommandKind::Ttl, Value::into_int)
    }

    /// EXPIRE. Returns true when the timeout was set.
    pub fn expire(&mut self, key: &[u8], seconds: i64) -> ClientResult<Reply<bool>> {
        let args = CommandArgs::for_key(key).integer(seconds);
        self.dispatch(CommandKind::Expire, args)?
            .try_map(CommandKind::Expire, Value::into_bool)
    }

    /// MOVE a key to another logical database.
    pub fn move_key(&mut self, key: &[u8], database_id: i64) -> ClientResult<Reply<bool>> {
        let args = CommandArgs::for_key(key).integer(database_id);
        self.dispatch(CommandKind::Move, args)?
            .try_map(CommandKind::Move, Value::into_bool)
    }

    /// MSET.
    pub fn mset<I, K, V>(&mut self, entries: I) -> ClientResult<Reply<bool>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ArgValue>,
        V: Into<ArgValue>,
    {
        self.dispatch(CommandKind::MSet, CommandArgs::new().map(entries))?
            .try_map(CommandKind::MSet, Value::into_ok)
    }

    /// MSETNX. Returns false when any key already existed.
    pub fn msetnx<I, K, V>(&mut self, entries: I) -> ClientResult<Reply<bool>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ArgValue>,
        V: Into<ArgValue>,
    {
        self.dispatch(CommandKind::MSetNx, CommandArgs::new().map(entries))?
            .try_map(CommandKind::MSetNx, Value::into_bool)
    }

    /// COPY `source` to `destination`, optionally into another database.
    /// Returns false when nothing was copied.
    pub fn copy(
        &mut self,
        source: &[u8],
        destination: &[u8],
        database_id: Option<i64>,
        replace: bool,
    ) -> ClientResult<Reply<bool>> {
        let mut args = CommandArgs::for_key(source).destination(destination);
        if let Some(database_id) = database_id {
            args = args.database(database_id);
        }
        if replace {
            args = args.flag(TOKEN_REPLACE);
        }
        self.dispatch(CommandKind::Copy, args)?
            .try_map(CommandKind::Copy, Value::into_bool)
    }

    /// WATCH keys for the next transaction. Must be issued before
    /// `begin_transaction`.
    pub fn watch<I, K>(&mut self, keys: I) -> ClientResult<Reply<bool>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        self.dispatch(CommandKind::Watch, CommandArgs::new().keys(keys))?
            .try_map(CommandKind::Watch, Value::into_ok)
    }

    /// UNWATCH every watched key.
    pub fn unwatch(&mut self) -> ClientResult<Reply<bool>> {
        self.dispatch(CommandKind::UnWatch, CommandArgs::new())?
            .try_map(CommandKind::UnWatch, Value::into_ok)
    }

    /// PFADD. Returns 1 when the estimate changed.
    pub fn pfadd<I, M>(&mut self, key: &[u8], members: I) -> ClientResult<Reply<i64>>
    where
        I: IntoIterator<Item = M>,
        M: Into<ArgValue>,
    {
        let args = CommandArgs::for_key(key).fields(members);
        self.dispatch(CommandKind::PfAdd, args)?
            .try_map(CommandKind::PfAdd, Value::into_int)
    }

    /// PFCOUNT over the union of `keys`.
    pub fn pfcount<I, K>(&mut self, keys: I) -> ClientResult<Reply<i64>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        self.dispatch(CommandKind::PfCount, CommandArgs::new().keys(keys))?
            .try_map(CommandKind::PfCount, Value::into_int)
    }

    /// PFMERGE `sources` into `destination`.
    pub fn pfmerge<I, K>(&mut self, destination: &[u8], sources: I) -> ClientResult<Reply<bool>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        let keys: Vec<Bytes> = std::iter::once(Bytes::copy_from_slice(destination))
            .chain(
                sources
                    .into_iter()
                    .map(|key| Bytes::copy_from_slice(key.as_ref())),
            )
            .collect();
        self.dispatch(CommandKind::PfMerge, CommandArgs::new().keys(keys))?
            .try_map(CommandKind::PfMerge, Value::into_ok)
    }

    /// PING, optionally echoing `message`.
    pub fn ping(&mut self, message: Option<&[u8]>) -> ClientResult<Reply<Value>> {
        let mut args = CommandArgs::new();
        if let Some(message) = message {
            args = args.value(message);
        }
        self.dispatch(CommandKind::Ping, args)
    }

    /// WAIT for `replicas` acknowledgements or `timeout_ms`.
    pub fn wait(&mut self, replicas: i64, timeout_ms: i64) -> ClientResult<Reply<i64>> {
        let args = CommandArgs::new().integer(replicas).integer(timeout_ms);
        self.dispatch(CommandKind::Wait, args)?
            .try_map(CommandKind::Wait, Value::into_int)
    }

    /// SELECT a logical database. Never queued.
    pub fn select(&mut self, database_id: i64) -> ClientResult<bool> {
        let args = CommandArgs::new().integer(database_id);
        let selected = self
            .dispatch(CommandKind::Select, args)?
            .try_map(CommandKind::Select, Value::into_ok)?
            .value()
            .unwrap_or(false);
        if selected {
            self.set_database_id(database_id);
        }
        Ok(selected)
    }

    /// FLUSHDB.
    pub fn flushdb(
        &mut self,
        mode: FlushMode,
        route: Option<&Route>,
    ) -> ClientResult<Reply<bool>> {
        self.flush(CommandKind::FlushDb, mode, route)
    }

    /// FLUSHALL.
    pub fn flushall(
        &mut self,
        mode: FlushMode,
        route: Option<&Route>,
    ) -> ClientResult<Reply<bool>> {
        self.flush(CommandKind::FlushAll, mode, route)
    }

    fn flush(
        &mut self,
        kind: CommandKind,
        mode: FlushMode,
        route: Option<&Route>,
    ) -> ClientResult<Reply<bool>> {
        let mut args = CommandArgs::new();
        if let Some(token) = mode.token() {
            args = args.flag(token);
        }
        self.dispatch_routed(kind, args, route)?
            .try_map(kind, Value::into_ok)
    }

    /// TIME: `[seconds, microseconds]` as reported by the server.
    pub fn time(&mut self, route: Option<&Route>) -> ClientResult<Reply<Vec<Value>>> {
        self.dispatch_routed(CommandKind::Time, CommandArgs::new(), route)?
            .try_map(CommandKind::Time, Value::into_list)
    }

    /// Number of keys in the selected database.
    pub fn dbsize(&mut self, route: Option<&Route>) -> ClientResult<Reply<i64>> {
        self.dispatch_routed(CommandKind::DbSize, CommandArgs::new(), route)?
            .try_map(CommandKind::DbSize, Value::into_int)
    }

    /// Sends caller-supplied tokens verbatim; the first token is the command word.
    pub fn raw_command<I, V>(
        &mut self,
        tokens: I,
        route: Option<&Route>,
    ) -> ClientResult<Reply<Value>>
    where
        I: IntoIterator<Item = V>,
        V: Into<ArgValue>,
    {
        self.dispatch_routed(CommandKind::Custom, CommandArgs::new().raw(tokens), route)
    }
}
