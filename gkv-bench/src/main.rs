//! # Client Benchmark Harness
//!
//! Purpose: Measure the cost of the client core itself (marshaling, dispatch,
//! batch buffering and decoding) against an in-process driver that answers
//! instantly, so regressions are not hidden behind network latency.
//!
//! ## Design Principles
//! 1. **Deterministic Workload**: Keys are picked from a seeded sequence, so two
//!    runs issue the same commands.
//! 2. **Allocation Control**: Key and field names are built before the timer starts.
//! 3. **Round Trips Are Reported**: Each phase prints both per-command cost and
//!    per-round-trip cost; pipelining trades the first for the second.
//!
//! Usage: `bench_client [commands] [batch_size] [fields] [keys]`

use std::env;
use std::hint::black_box;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use gkv_client::{compose, spec, ClientConfig, CommandArgs, Condition, Expiry, KvClient};
use gkv_common::{
    ArgumentVector, CommandKind, CommandRef, Driver, DriverResult, RawResponse, Route,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_COMMANDS: usize = 200_000;
const DEFAULT_BATCH_SIZE: usize = 64;
const DEFAULT_FIELDS: usize = 8;
const DEFAULT_KEYS: usize = 4096;

struct BenchConfig {
    commands: usize,
    batch_size: usize,
    fields: usize,
    keys: usize,
}

impl BenchConfig {
    /// Positional arguments; a missing one falls back to its default, a
    /// malformed one is an error.
    fn from_args() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut next = |name: &str, default: usize| -> Result<usize> {
            match args.next() {
                Some(raw) => raw
                    .parse()
                    .with_context(|| format!("{name} must be a non-negative integer, got {raw:?}")),
                None => Ok(default),
            }
        };

        let config = BenchConfig {
            commands: next("commands", DEFAULT_COMMANDS)?,
            batch_size: next("batch_size", DEFAULT_BATCH_SIZE)?,
            fields: next("fields", DEFAULT_FIELDS)?,
            keys: next("keys", DEFAULT_KEYS)?,
        };
        if config.commands == 0 || config.batch_size == 0 {
            bail!("commands and batch_size must be positive");
        }
        if config.fields == 0 || config.keys == 0 {
            bail!("fields and keys must be positive");
        }
        Ok(config)
    }
}

/// Picks keys from a fixed pool using a seeded xorshift sequence.
struct KeyPicker {
    state: u64,
}

impl KeyPicker {
    fn seeded(seed: u64) -> Self {
        KeyPicker { state: seed | 1 }
    }

    fn pick<'a>(&mut self, pool: &'a [String]) -> &'a [u8] {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        let idx = (self.state % pool.len() as u64) as usize;
        pool[idx].as_bytes()
    }
}

/// Driver that answers every command immediately with a plausible reply.
#[derive(Default)]
struct InstantDriver {
    round_trips: usize,
}

impl InstantDriver {
    fn reply_for(kind: CommandKind, args: &ArgumentVector) -> RawResponse {
        match kind {
            CommandKind::HSet | CommandKind::HSetEx => {
                RawResponse::Int((args.len().saturating_sub(1) / 2) as i64)
            }
            CommandKind::HMGet => RawResponse::Array(
                args.iter()
                    .skip(1)
                    .map(|field| RawResponse::String(Bytes::copy_from_slice(field)))
                    .collect(),
            ),
            CommandKind::HGet => RawResponse::bulk(b"value"),
            _ => RawResponse::Ok,
        }
    }
}

impl Driver for InstantDriver {
    fn execute(&mut self, kind: CommandKind, args: &ArgumentVector) -> DriverResult<RawResponse> {
        self.round_trips += 1;
        Ok(Self::reply_for(kind, args))
    }

    fn execute_with_route(
        &mut self,
        kind: CommandKind,
        args: &ArgumentVector,
        _route: &Route,
    ) -> DriverResult<RawResponse> {
        self.execute(kind, args)
    }

    fn execute_batch(
        &mut self,
        commands: &[CommandRef<'_>],
        _atomic: bool,
    ) -> DriverResult<Vec<RawResponse>> {
        self.round_trips += 1;
        Ok(commands
            .iter()
            .map(|command| Self::reply_for(command.kind, command.args))
            .collect())
    }

    fn close(&mut self) {}
}

fn names(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|idx| format!("{prefix}:{idx:08}")).collect()
}

/// Prints throughput for one phase. `round_trips` is zero for phases that
/// never reach the driver.
fn report(phase: &str, commands: usize, round_trips: usize, elapsed: Duration) {
    let micros = elapsed.as_secs_f64() * 1e6;
    let per_command_ns = micros * 1e3 / commands as f64;
    let commands_per_sec = commands as f64 / elapsed.as_secs_f64();
    let line = format!(
        "{phase:<16} {commands:>9} cmds  {commands_per_sec:>12.0} cmd/s  \
         {per_command_ns:>8.1} ns/cmd"
    );
    if round_trips == 0 {
        println!("{line}");
    } else {
        let per_trip_us = micros / round_trips as f64;
        println!("{line}  {round_trips:>7} trips  {per_trip_us:>8.2} us/trip");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run() {
        eprintln!("bench_client: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = BenchConfig::from_args()?;
    let keys = names("hash", config.keys);
    let fields = names("field", config.fields);
    info!(
        commands = config.commands,
        batch_size = config.batch_size,
        fields = config.fields,
        keys = config.keys,
        "starting client benchmark"
    );

    let mut picker = KeyPicker::seeded(0x5EED_CAFE_F00D_D00D);

    let hsetex = spec(CommandKind::HSetEx);
    let start = Instant::now();
    for _ in 0..config.commands {
        let args = CommandArgs::for_key(picker.pick(&keys))
            .map(fields.iter().map(|field| (field.as_str(), field.as_str())))
            .condition(Some(Condition::Nx))
            .expiry(Some(Expiry::seconds(60)));
        black_box(compose(hsetex.grammar, &args).context("marshaling HSETEX")?);
    }
    report("marshal hsetex", config.commands, 0, start.elapsed());

    let mut client = KvClient::new(InstantDriver::default(), ClientConfig::default());

    let start = Instant::now();
    for _ in 0..config.commands {
        let reply = client
            .hmget(picker.pick(&keys), fields.iter().map(String::as_str))
            .context("direct HMGET")?;
        black_box(reply);
    }
    let trips = client.driver().round_trips;
    report("direct hmget", config.commands, trips, start.elapsed());

    let start = Instant::now();
    let mut sent = 0usize;
    while sent < config.commands {
        let batch = config.batch_size.min(config.commands - sent);
        client.begin_pipeline();
        for _ in 0..batch {
            client
                .hset(picker.pick(&keys), ["field", "value"])
                .context("queueing HSET")?;
        }
        let results = client.commit().context("committing pipeline")?;
        sent += results.len();
        black_box(results);
    }
    let trips = client.driver().round_trips - trips;
    report("pipelined hset", sent, trips, start.elapsed());

    client.close();
    Ok(())
}
