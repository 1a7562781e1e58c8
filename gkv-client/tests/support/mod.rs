#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use gkv_client::{
    ArgumentVector, ClientConfig, CommandKind, CommandRef, Connect, Driver, DriverError,
    DriverResult, KvClient, RawResponse, Route,
};

/// One call observed by the scripted driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Execute {
        command: CommandKind,
        args: Vec<String>,
    },
    Routed {
        command: CommandKind,
        args: Vec<String>,
        route: Route,
    },
    Batch {
        atomic: bool,
        commands: Vec<(CommandKind, Vec<String>)>,
    },
}

/// Settings accepted by `ScriptedDriver::open`.
pub struct ScriptOptions {
    pub reachable: bool,
    pub replies: Vec<RawResponse>,
}

/// In-memory driver that records every call and replays canned replies.
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    replies: VecDeque<DriverResult<RawResponse>>,
    batch_replies: VecDeque<DriverResult<Vec<RawResponse>>>,
    calls: Vec<Call>,
    closed: Rc<Cell<usize>>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        ScriptedDriver::default()
    }

    pub fn reply(mut self, raw: RawResponse) -> Self {
        self.replies.push_back(Ok(raw));
        self
    }

    pub fn fail(mut self, err: DriverError) -> Self {
        self.replies.push_back(Err(err));
        self
    }

    pub fn batch_reply(mut self, raws: Vec<RawResponse>) -> Self {
        self.batch_replies.push_back(Ok(raws));
        self
    }

    pub fn batch_fail(mut self, err: DriverError) -> Self {
        self.batch_replies.push_back(Err(err));
        self
    }

    pub fn close_counter(&self) -> Rc<Cell<usize>> {
        self.closed.clone()
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    fn next_reply(&mut self) -> DriverResult<RawResponse> {
        self.replies
            .pop_front()
            .unwrap_or_else(|| Err(DriverError::command("unscripted command")))
    }
}

impl Driver for ScriptedDriver {
    fn execute(&mut self, kind: CommandKind, args: &ArgumentVector) -> DriverResult<RawResponse> {
        self.calls.push(Call::Execute {
            command: kind,
            args: args.to_strings_lossy(),
        });
        self.next_reply()
    }

    fn execute_with_route(
        &mut self,
        kind: CommandKind,
        args: &ArgumentVector,
        route: &Route,
    ) -> DriverResult<RawResponse> {
        self.calls.push(Call::Routed {
            command: kind,
            args: args.to_strings_lossy(),
            route: route.clone(),
        });
        self.next_reply()
    }

    fn execute_batch(
        &mut self,
        commands: &[CommandRef<'_>],
        atomic: bool,
    ) -> DriverResult<Vec<RawResponse>> {
        self.calls.push(Call::Batch {
            atomic,
            commands: commands
                .iter()
                .map(|command| (command.kind, command.args.to_strings_lossy()))
                .collect(),
        });
        self.batch_replies
            .pop_front()
            .unwrap_or_else(|| Err(DriverError::command("unscripted batch")))
    }

    fn close(&mut self) {
        self.closed.set(self.closed.get() + 1);
    }
}

impl Connect for ScriptedDriver {
    type Options = ScriptOptions;

    fn open(options: &ScriptOptions) -> DriverResult<Self> {
        if !options.reachable {
            return Err(DriverError::connection("connection refused"));
        }
        let mut driver = ScriptedDriver::new();
        for raw in &options.replies {
            driver = driver.reply(raw.clone());
        }
        Ok(driver)
    }
}

pub fn client(driver: ScriptedDriver) -> KvClient<ScriptedDriver> {
    KvClient::new(driver, ClientConfig::default())
}

pub fn cluster_client(driver: ScriptedDriver) -> KvClient<ScriptedDriver> {
    let config = ClientConfig {
        cluster_mode: true,
        ..ClientConfig::default()
    };
    KvClient::new(driver, config)
}

pub fn bulk(text: &str) -> RawResponse {
    RawResponse::bulk(text.as_bytes())
}

pub fn strings(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|token| token.to_string()).collect()
}
