//! # Command Table
//!
//! Purpose: One entry per `CommandKind` naming how its arguments are composed,
//! how its reply is decoded and whether it may be queued in a batch. The
//! dispatcher reads this table instead of carrying per-command code paths.

use gkv_common::CommandKind;

/// Argument grammar, i.e. which marshaler composes the vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// `[key]`
    KeyOnly,
    /// `[key, field]`
    SingleField,
    /// `[key, field, value]`
    FieldValue,
    /// `[key, field...]`
    MultiField,
    /// `[key, field, value, ...]`
    SetPairs,
    /// `[key, field, delta]`
    Increment,
    /// `[key, (count), (WITHVALUES)]`
    RandomField,
    /// `[key, (FNX|FXX), (unit value | KEEPTTL), FIELDS, n, field value...]`
    FieldExpirySet,
    /// `[key, value, (NX|XX|GT|LT), FIELDS, n, field...]`
    FieldExpire,
    /// `[key, FIELDS, n, field...]`
    FieldQuery,
    /// `[key, (unit value | PERSIST), FIELDS, n, field...]`
    GetWithExpiry,
    /// `[key, value, (NX|XX), (unit value | KEEPTTL)]`
    KeyValue,
    /// `[key...]`
    Keys,
    /// `[key, member...]`, members optional
    KeyMembers,
    /// `[source, destination, (DB id), (REPLACE)]`
    Copy,
    /// `[key, integer]`
    KeyInteger,
    /// `[key, value, key, value, ...]`
    KeyPairs,
    /// `[integer...]`
    Integers,
    /// `[flag...]`
    Flags,
    /// `[(message)]`
    OptionalMessage,
    /// `[]`
    Empty,
    /// Caller tokens, verbatim.
    Raw,
}

/// Expected reply shape, i.e. which decoder runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape {
    Integer,
    Boolean,
    String,
    List,
    Map,
    Ok,
    Float,
    MultiGet,
    FieldExpiryGet,
    RandomField,
    Any,
}

/// Whether a command may be queued while batching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPolicy {
    Allowed,
    /// Never queued.
    Forbidden,
    /// Queued only on standalone deployments.
    StandaloneOnly,
}

impl BatchPolicy {
    /// True when the command may be buffered for the given deployment.
    pub fn permits(self, cluster_mode: bool) -> bool {
        match self {
            BatchPolicy::Allowed => true,
            BatchPolicy::Forbidden => false,
            BatchPolicy::StandaloneOnly => !cluster_mode,
        }
    }
}

/// Table entry for one command kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub grammar: Grammar,
    pub reply: ReplyShape,
    pub batch: BatchPolicy,
}

const fn entry(grammar: Grammar, reply: ReplyShape) -> CommandSpec {
    CommandSpec {
        grammar,
        reply,
        batch: BatchPolicy::Allowed,
    }
}

const fn restricted(grammar: Grammar, reply: ReplyShape, batch: BatchPolicy) -> CommandSpec {
    CommandSpec {
        grammar,
        reply,
        batch,
    }
}

/// Looks up the table entry for `kind`.
pub const fn spec(kind: CommandKind) -> CommandSpec {
    use CommandKind as K;
    use Grammar as G;
    use ReplyShape as R;

    match kind {
        K::HLen => entry(G::KeyOnly, R::Integer),
        K::HKeys | K::HVals => entry(G::KeyOnly, R::List),
        K::HGetAll => entry(G::KeyOnly, R::Map),
        K::HGet => entry(G::SingleField, R::String),
        K::HExists => entry(G::SingleField, R::Boolean),
        K::HStrLen => entry(G::SingleField, R::Integer),
        K::HSetNx => entry(G::FieldValue, R::Boolean),
        K::HDel => entry(G::MultiField, R::Integer),
        K::HMGet => entry(G::MultiField, R::MultiGet),
        K::HSet => entry(G::SetPairs, R::Integer),
        K::HMSet => entry(G::SetPairs, R::Ok),
        K::HIncrBy => entry(G::Increment, R::Integer),
        K::HIncrByFloat => entry(G::Increment, R::Float),
        K::HRandField => entry(G::RandomField, R::RandomField),
        K::HSetEx => entry(G::FieldExpirySet, R::Integer),
        K::HExpire | K::HPExpire | K::HExpireAt | K::HPExpireAt => {
            entry(G::FieldExpire, R::List)
        }
        K::HTtl | K::HPTtl | K::HExpireTime | K::HPExpireTime | K::HPersist => {
            entry(G::FieldQuery, R::List)
        }
        K::HGetEx => entry(G::GetWithExpiry, R::FieldExpiryGet),
        K::Get => entry(G::KeyOnly, R::String),
        K::Set => entry(G::KeyValue, R::Ok),
        K::Del | K::Exists => entry(G::Keys, R::Integer),
        K::Incr | K::Ttl => entry(G::KeyOnly, R::Integer),
        K::IncrBy => entry(G::KeyInteger, R::Integer),
        K::Expire | K::Move => entry(G::KeyInteger, R::Boolean),
        K::MSet => entry(G::KeyPairs, R::Ok),
        K::MSetNx => entry(G::KeyPairs, R::Boolean),
        K::Copy => entry(G::Copy, R::Boolean),
        K::Watch => restricted(G::Keys, R::Ok, BatchPolicy::Forbidden),
        K::UnWatch => entry(G::Empty, R::Ok),
        K::PfAdd => entry(G::KeyMembers, R::Integer),
        K::PfCount => entry(G::Keys, R::Integer),
        K::PfMerge => entry(G::Keys, R::Ok),
        K::Ping => entry(G::OptionalMessage, R::Any),
        K::Wait => entry(G::Integers, R::Integer),
        K::Select => restricted(G::Integers, R::Ok, BatchPolicy::Forbidden),
        K::FlushDb | K::FlushAll => restricted(G::Flags, R::Ok, BatchPolicy::StandaloneOnly),
        K::Time => restricted(G::Empty, R::List, BatchPolicy::StandaloneOnly),
        K::DbSize => restricted(G::Empty, R::Integer, BatchPolicy::StandaloneOnly),
        K::Custom => entry(G::Raw, R::Any),
    }
}
