// command.rs - command kinds understood by the GlideKV client core
//
// Every operation the client can marshal has exactly one `CommandKind`. The
// kind travels to the driver next to the argument vector, and its `name()` is
// the command word the store expects on the wire.
//
// ============================================================================
// GROUPING
// ============================================================================
//
// - Hash commands: plain field access (HGET, HSET, ...), counters
//   (HINCRBY, HINCRBYFLOAT), sampling (HRANDFIELD) and the field-expiration
//   family (HSETEX, HGETEX, HEXPIRE, HTTL, HPERSIST, ...).
// - Keyspace commands: string values and key lifetime (GET, SET, DEL, ...),
//   optimistic locking (WATCH, UNWATCH) and HyperLogLog counters (PFADD, ...).
// - Server commands: connection and database level operations (SELECT,
//   FLUSHDB, TIME, ...). Several of these are restricted inside batches.
// - `Custom`: caller-supplied tokens sent verbatim.

use std::fmt;

// ============================================================================
// KEYWORD TOKENS
// ============================================================================

/// Marks the start of the `numfields field...` block of field-expiration commands.
pub const TOKEN_FIELDS: &str = "FIELDS";

/// Requests field values alongside names from HRANDFIELD.
pub const TOKEN_WITHVALUES: &str = "WITHVALUES";

/// Clears field expiration in HGETEX.
pub const TOKEN_PERSIST: &str = "PERSIST";

/// Retains the current expiration in SET and HSETEX.
pub const TOKEN_KEEPTTL: &str = "KEEPTTL";

/// Lets COPY overwrite an existing destination key.
pub const TOKEN_REPLACE: &str = "REPLACE";

/// Introduces the target database of COPY.
pub const TOKEN_DB: &str = "DB";

/// Asynchronous variant of FLUSHDB / FLUSHALL.
pub const TOKEN_ASYNC: &str = "ASYNC";

/// Synchronous variant of FLUSHDB / FLUSHALL.
pub const TOKEN_SYNC: &str = "SYNC";

// ============================================================================
// COMMAND KINDS
// ============================================================================

/// One variant per supported store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    // Hash: field access
    HDel,
    HExists,
    HGet,
    HGetAll,
    HKeys,
    HLen,
    HMGet,
    HMSet,
    HSet,
    HSetNx,
    HStrLen,
    HVals,
    // Hash: counters and sampling
    HIncrBy,
    HIncrByFloat,
    HRandField,
    // Hash: field expiration
    HSetEx,
    HGetEx,
    HExpire,
    HPExpire,
    HExpireAt,
    HPExpireAt,
    HTtl,
    HPTtl,
    HExpireTime,
    HPExpireTime,
    HPersist,
    // Keyspace
    Get,
    Set,
    Del,
    Exists,
    Incr,
    IncrBy,
    Expire,
    Ttl,
    Move,
    MSet,
    MSetNx,
    Copy,
    // Keyspace: optimistic locking
    Watch,
    UnWatch,
    // Keyspace: HyperLogLog
    PfAdd,
    PfCount,
    PfMerge,
    // Server
    Ping,
    Wait,
    Select,
    FlushDb,
    FlushAll,
    Time,
    DbSize,
    /// Caller-supplied tokens; the command word is the first argument.
    Custom,
}

impl CommandKind {
    /// Every kind, in declaration order.
    pub const ALL: [CommandKind; 51] = [
        CommandKind::HDel,
        CommandKind::HExists,
        CommandKind::HGet,
        CommandKind::HGetAll,
        CommandKind::HKeys,
        CommandKind::HLen,
        CommandKind::HMGet,
        CommandKind::HMSet,
        CommandKind::HSet,
        CommandKind::HSetNx,
        CommandKind::HStrLen,
        CommandKind::HVals,
        CommandKind::HIncrBy,
        CommandKind::HIncrByFloat,
        CommandKind::HRandField,
        CommandKind::HSetEx,
        CommandKind::HGetEx,
        CommandKind::HExpire,
        CommandKind::HPExpire,
        CommandKind::HExpireAt,
        CommandKind::HPExpireAt,
        CommandKind::HTtl,
        CommandKind::HPTtl,
        CommandKind::HExpireTime,
        CommandKind::HPExpireTime,
        CommandKind::HPersist,
        CommandKind::Get,
        CommandKind::Set,
        CommandKind::Del,
        CommandKind::Exists,
        CommandKind::Incr,
        CommandKind::IncrBy,
        CommandKind::Expire,
        CommandKind::Ttl,
        CommandKind::Move,
        CommandKind::MSet,
        CommandKind::MSetNx,
        CommandKind::Copy,
        CommandKind::Watch,
        CommandKind::UnWatch,
        CommandKind::PfAdd,
        CommandKind::PfCount,
        CommandKind::PfMerge,
        CommandKind::Ping,
        CommandKind::Wait,
        CommandKind::Select,
        CommandKind::FlushDb,
        CommandKind::FlushAll,
        CommandKind::Time,
        CommandKind::DbSize,
        CommandKind::Custom,
    ];

    /// Command word sent to the store.
    pub const fn name(self) -> &'static str {
        match self {
            CommandKind::HDel => "HDEL",
            CommandKind::HExists => "HEXISTS",
            CommandKind::HGet => "HGET",
            CommandKind::HGetAll => "HGETALL",
            CommandKind::HKeys => "HKEYS",
            CommandKind::HLen => "HLEN",
            CommandKind::HMGet => "HMGET",
            CommandKind::HMSet => "HMSET",
            CommandKind::HSet => "HSET",
            CommandKind::HSetNx => "HSETNX",
            CommandKind::HStrLen => "HSTRLEN",
            CommandKind::HVals => "HVALS",
            CommandKind::HIncrBy => "HINCRBY",
            CommandKind::HIncrByFloat => "HINCRBYFLOAT",
            CommandKind::HRandField => "HRANDFIELD",
            CommandKind::HSetEx => "HSETEX",
            CommandKind::HGetEx => "HGETEX",
            CommandKind::HExpire => "HEXPIRE",
            CommandKind::HPExpire => "HPEXPIRE",
            CommandKind::HExpireAt => "HEXPIREAT",
            CommandKind::HPExpireAt => "HPEXPIREAT",
            CommandKind::HTtl => "HTTL",
            CommandKind::HPTtl => "HPTTL",
            CommandKind::HExpireTime => "HEXPIRETIME",
            CommandKind::HPExpireTime => "HPEXPIRETIME",
            CommandKind::HPersist => "HPERSIST",
            CommandKind::Get => "GET",
            CommandKind::Set => "SET",
            CommandKind::Del => "DEL",
            CommandKind::Exists => "EXISTS",
            CommandKind::Incr => "INCR",
            CommandKind::IncrBy => "INCRBY",
            CommandKind::Expire => "EXPIRE",
            CommandKind::Ttl => "TTL",
            CommandKind::Move => "MOVE",
            CommandKind::MSet => "MSET",
            CommandKind::MSetNx => "MSETNX",
            CommandKind::Copy => "COPY",
            CommandKind::Watch => "WATCH",
            CommandKind::UnWatch => "UNWATCH",
            CommandKind::PfAdd => "PFADD",
            CommandKind::PfCount => "PFCOUNT",
            CommandKind::PfMerge => "PFMERGE",
            CommandKind::Ping => "PING",
            CommandKind::Wait => "WAIT",
            CommandKind::Select => "SELECT",
            CommandKind::FlushDb => "FLUSHDB",
            CommandKind::FlushAll => "FLUSHALL",
            CommandKind::Time => "TIME",
            CommandKind::DbSize => "DBSIZE",
            CommandKind::Custom => "CUSTOM",
        }
    }

    /// True for commands operating on hash keys.
    pub const fn is_hash(self) -> bool {
        matches!(
            self,
            CommandKind::HDel
                | CommandKind::HExists
                | CommandKind::HGet
                | CommandKind::HGetAll
                | CommandKind::HKeys
                | CommandKind::HLen
                | CommandKind::HMGet
                | CommandKind::HMSet
                | CommandKind::HSet
                | CommandKind::HSetNx
                | CommandKind::HStrLen
                | CommandKind::HVals
                | CommandKind::HIncrBy
                | CommandKind::HIncrByFloat
                | CommandKind::HRandField
                | CommandKind::HSetEx
                | CommandKind::HGetEx
                | CommandKind::HExpire
                | CommandKind::HPExpire
                | CommandKind::HExpireAt
                | CommandKind::HPExpireAt
                | CommandKind::HTtl
                | CommandKind::HPTtl
                | CommandKind::HExpireTime
                | CommandKind::HPExpireTime
                | CommandKind::HPersist
        )
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_upper_case_ascii() {
        for kind in CommandKind::ALL {
            let name = kind.name();
            assert!(!name.is_empty());
            assert!(name.bytes().all(|b| b.is_ascii_uppercase()), "{}", name);
        }
    }

    #[test]
    fn test_hash_family() {
        assert!(CommandKind::HSetEx.is_hash());
        assert!(CommandKind::HPersist.is_hash());
        assert!(!CommandKind::Get.is_hash());
        assert!(!CommandKind::Custom.is_hash());
    }

    #[test]
    fn test_display_uses_wire_name() {
        assert_eq!(CommandKind::HIncrByFloat.to_string(), "HINCRBYFLOAT");
        assert_eq!(format!("{}", CommandKind::FlushAll), "FLUSHALL");
        assert_eq!(CommandKind::UnWatch.to_string(), "UNWATCH");
    }

    #[test]
    fn test_all_lists_each_kind_once() {
        for (idx, kind) in CommandKind::ALL.iter().enumerate() {
            assert!(!CommandKind::ALL[idx + 1..].contains(kind), "{}", kind);
        }
        assert!(CommandKind::ALL.contains(&CommandKind::Watch));
        assert!(CommandKind::ALL.contains(&CommandKind::DbSize));
    }
}
