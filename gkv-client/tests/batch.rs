mod support;

use gkv_client::{
    BatchMode, ClientConfig, ClientError, CommandArgs, CommandKind, DriverError, Expiry,
    FlushMode, KvClient, MarshalError, RawResponse, Reply, Route, Value,
};

use support::*;

#[test]
fn transaction_queues_then_commits_in_order() {
    let driver = ScriptedDriver::new().batch_reply(vec![
        RawResponse::Int(1),
        bulk("ann"),
        RawResponse::Array(vec![bulk("ann"), RawResponse::Null]),
    ]);
    let mut client = client(driver);

    client.begin_transaction();
    assert_eq!(client.batch_mode(), BatchMode::Atomic);
    assert_eq!(client.hset(b"u", ["name", "ann"]).unwrap(), Reply::Queued(0));
    assert_eq!(client.hget(b"u", "name").unwrap(), Reply::Queued(1));
    assert_eq!(client.hmget(b"u", ["name", "nick"]).unwrap(), Reply::Queued(2));
    assert_eq!(client.queued(), 3);

    let results = client.commit().unwrap();
    assert_eq!(
        results,
        vec![
            Value::Int(1),
            Value::from("ann"),
            Value::Map(vec![
                (Value::from("name"), Value::from("ann")),
                (Value::from("nick"), Value::Bool(false)),
            ]),
        ]
    );
    assert_eq!(client.batch_mode(), BatchMode::None);
    assert_eq!(client.queued(), 0);
    assert_eq!(
        client.driver().calls(),
        &[Call::Batch {
            atomic: true,
            commands: vec![
                (CommandKind::HSet, strings(&["u", "name", "ann"])),
                (CommandKind::HGet, strings(&["u", "name"])),
                (CommandKind::HMGet, strings(&["u", "name", "nick"])),
            ],
        }]
    );
}

#[test]
fn pipeline_commits_without_atomicity() {
    let driver = ScriptedDriver::new().batch_reply(vec![RawResponse::Int(5)]);
    let mut client = client(driver);
    client.begin_pipeline().hlen(b"h").unwrap();
    assert_eq!(client.commit().unwrap(), vec![Value::Int(5)]);
    assert!(matches!(
        client.driver().calls(),
        [Call::Batch { atomic: false, .. }]
    ));
}

#[test]
fn begin_while_batching_keeps_buffer() {
    let mut client = client(ScriptedDriver::new());
    client.begin_transaction();
    client.hlen(b"h").unwrap();
    client.begin_pipeline();
    client.begin_transaction();
    assert_eq!(client.batch_mode(), BatchMode::Atomic);
    assert_eq!(client.queued(), 1);
}

#[test]
fn commit_outside_batch_fails() {
    let mut client = client(ScriptedDriver::new());
    assert!(matches!(client.commit(), Err(ClientError::NotBatching)));
    assert!(client.driver().calls().is_empty());
}

#[test]
fn empty_commit_fails_without_driver_call() {
    let mut client = client(ScriptedDriver::new());
    client.begin_transaction();
    assert!(matches!(client.commit(), Err(ClientError::EmptyBatch)));
    assert_eq!(client.batch_mode(), BatchMode::Atomic);
    assert!(client.driver().calls().is_empty());
}

#[test]
fn discard_twice_fails_the_second_time() {
    let mut client = client(ScriptedDriver::new());
    client.begin_transaction();
    client.hset(b"h", ["a", "1"]).unwrap();
    client.hdel(b"h", ["a"]).unwrap();

    client.discard().unwrap();
    assert_eq!(client.batch_mode(), BatchMode::None);
    assert_eq!(client.queued(), 0);

    assert!(matches!(client.discard(), Err(ClientError::NotBatching)));
    assert_eq!(client.batch_mode(), BatchMode::None);
    assert!(client.driver().calls().is_empty());
}

#[test]
fn driver_failure_clears_batch() {
    let driver = ScriptedDriver::new().batch_fail(DriverError::connection("reset"));
    let mut client = client(driver);
    client.begin_transaction();
    client.hlen(b"h").unwrap();

    let err = client.commit().unwrap_err();
    assert!(matches!(err, ClientError::Driver(DriverError::Connection { .. })));
    assert_eq!(client.batch_mode(), BatchMode::None);
    assert_eq!(client.queued(), 0);
}

#[test]
fn reply_count_mismatch_fails_and_clears() {
    let driver = ScriptedDriver::new().batch_reply(vec![RawResponse::Int(1)]);
    let mut client = client(driver);
    client.begin_pipeline();
    client.hlen(b"a").unwrap();
    client.hlen(b"b").unwrap();

    let err = client.commit().unwrap_err();
    assert!(matches!(
        err,
        ClientError::BatchLengthMismatch {
            expected: 2,
            actual: 1
        }
    ));
    assert_eq!(client.batch_mode(), BatchMode::None);
    assert_eq!(client.queued(), 0);
}

#[test]
fn decode_failure_is_local_to_its_position() {
    let driver = ScriptedDriver::new().batch_reply(vec![
        RawResponse::Int(1),
        bulk("not a number"),
        RawResponse::Error("WRONGTYPE".into()),
        RawResponse::Ok,
    ]);
    let mut client = client(driver);
    client.begin_transaction();
    client.hlen(b"a").unwrap();
    client.hlen(b"b").unwrap();
    client.hget(b"c", "f").unwrap();
    client.hmset(b"d", [("f", "v")]).unwrap();

    assert_eq!(
        client.commit().unwrap(),
        vec![
            Value::Int(1),
            Value::Bool(false),
            Value::Bool(false),
            Value::Bool(true),
        ]
    );
}

#[test]
fn select_is_rejected_while_batching() {
    let mut client = client(ScriptedDriver::new());
    client.begin_transaction();
    client.hlen(b"h").unwrap();

    let err = client.select(1).unwrap_err();
    assert!(matches!(err, ClientError::NotAllowedInBatch { command: "SELECT" }));
    assert_eq!(client.queued(), 1);
    assert_eq!(client.batch_mode(), BatchMode::Atomic);
}

#[test]
fn database_commands_queue_only_on_standalone() {
    let mut standalone = client(ScriptedDriver::new());
    standalone.begin_pipeline();
    assert_eq!(
        standalone.flushdb(FlushMode::Default, None).unwrap(),
        Reply::Queued(0)
    );
    assert_eq!(standalone.time(None).unwrap(), Reply::Queued(1));

    let mut cluster = cluster_client(ScriptedDriver::new());
    cluster.begin_pipeline();
    for err in [
        cluster.flushdb(FlushMode::Async, None).unwrap_err(),
        cluster.flushall(FlushMode::Default, None).unwrap_err(),
        cluster.time(None).unwrap_err(),
    ] {
        assert!(matches!(err, ClientError::NotAllowedInBatch { .. }));
    }
    assert_eq!(cluster.queued(), 0);
    assert_eq!(cluster.batch_mode(), BatchMode::Pipeline);
}

#[test]
fn queued_commands_ignore_routes() {
    let driver = ScriptedDriver::new().batch_reply(vec![RawResponse::Ok]);
    let mut client = client(driver);
    client.begin_transaction();
    client
        .flushall(FlushMode::Sync, Some(&Route::RandomNode))
        .unwrap();
    assert_eq!(client.commit().unwrap(), vec![Value::Bool(true)]);
    assert_eq!(
        client.driver().calls(),
        &[Call::Batch {
            atomic: true,
            commands: vec![(CommandKind::FlushAll, strings(&["SYNC"]))],
        }]
    );
}

#[test]
fn marshal_error_leaves_buffer_untouched() {
    let mut client = client(ScriptedDriver::new());
    client.begin_transaction();
    client.hlen(b"h").unwrap();

    let err = client.hset(b"h", ["orphan"]).unwrap_err();
    assert!(matches!(
        err,
        ClientError::Marshal {
            source: MarshalError::OddPairs { len: 1 },
            ..
        }
    ));
    assert_eq!(client.queued(), 1);
    assert_eq!(client.batch_mode(), BatchMode::Atomic);
}

#[test]
fn growth_past_initial_capacity_keeps_order() {
    let replies: Vec<RawResponse> = (0..20).map(RawResponse::Int).collect();
    let mut client = client(ScriptedDriver::new().batch_reply(replies));
    client.begin_pipeline();
    for index in 0..20 {
        let key = format!("key:{}", index);
        assert_eq!(client.hlen(key.as_bytes()).unwrap(), Reply::Queued(index));
    }

    let results = client.commit().unwrap();
    let expected: Vec<Value> = (0..20).map(Value::Int).collect();
    assert_eq!(results, expected);

    match client.driver().calls() {
        [Call::Batch { commands, .. }] => {
            for (index, (kind, args)) in commands.iter().enumerate() {
                assert_eq!(*kind, CommandKind::HLen);
                assert_eq!(args, &vec![format!("key:{}", index)]);
            }
        }
        other => panic!("unexpected calls {:?}", other),
    }
}

#[test]
fn buffer_is_recreated_after_commit() {
    let driver = ScriptedDriver::new()
        .batch_reply(vec![RawResponse::Int(1)])
        .batch_reply(vec![RawResponse::Int(2)]);
    let mut client = client(driver);

    client.begin_transaction().hlen(b"a").unwrap();
    assert_eq!(client.commit().unwrap(), vec![Value::Int(1)]);

    client.begin_pipeline().hlen(b"b").unwrap();
    assert_eq!(client.commit().unwrap(), vec![Value::Int(2)]);
    assert_eq!(client.driver().calls().len(), 2);
}

#[test]
fn reply_literal_applies_to_batches() {
    let config = ClientConfig {
        reply_literal: true,
        ..ClientConfig::default()
    };
    let driver = ScriptedDriver::new().batch_reply(vec![RawResponse::Ok]);
    let mut client = KvClient::new(driver, config);
    client.begin_transaction().set(b"k", "v").unwrap();
    assert_eq!(client.commit().unwrap(), vec![Value::from("OK")]);
}

#[test]
fn dropping_a_batching_client_discards_and_closes() {
    let driver = ScriptedDriver::new();
    let closed = driver.close_counter();
    {
        let mut client = client(driver);
        client.begin_transaction();
        client.hlen(b"h").unwrap();
    }
    assert_eq!(closed.get(), 1);
}

#[test]
fn hgetex_fields_survive_until_commit() {
    let driver = ScriptedDriver::new().batch_reply(vec![
        RawResponse::Int(1),
        RawResponse::Array(vec![bulk("ann"), RawResponse::Null]),
    ]);
    let mut client = client(driver);
    client.begin_transaction();
    client.hset(b"u", ["name", "ann"]).unwrap();
    assert_eq!(
        client
            .hgetex(b"u", ["name", "nick"], Some(Expiry::seconds(30)))
            .unwrap(),
        Reply::Queued(1)
    );

    let results = client.commit().unwrap();
    assert_eq!(
        results[1],
        Value::Map(vec![
            (Value::from("name"), Value::from("ann")),
            (Value::from("nick"), Value::Nil),
        ])
    );
    match &client.driver().calls()[0] {
        Call::Batch { commands, .. } => assert_eq!(
            commands[1],
            (
                CommandKind::HGetEx,
                strings(&["u", "EX", "30", "FIELDS", "2", "name", "nick"])
            )
        ),
        other => panic!("unexpected call {:?}", other),
    }
}

#[test]
fn watch_is_rejected_while_batching_but_unwatch_queues() {
    let mut client = client(ScriptedDriver::new());
    client.begin_transaction();

    let err = client.watch(["balance"]).unwrap_err();
    assert!(matches!(err, ClientError::NotAllowedInBatch { command: "WATCH" }));
    assert_eq!(client.queued(), 0);

    assert_eq!(client.unwatch().unwrap(), Reply::Queued(0));
    assert_eq!(client.batch_mode(), BatchMode::Atomic);
}

#[test]
fn watched_transaction_runs_in_order() {
    let driver = ScriptedDriver::new()
        .reply(RawResponse::Ok)
        .batch_reply(vec![RawResponse::Int(90), RawResponse::Int(1)]);
    let mut client = client(driver);

    assert_eq!(client.watch(["balance"]).unwrap(), Reply::Value(true));
    client.begin_transaction();
    client.incr_by(b"balance", -10).unwrap();
    client.pfadd(b"spenders", ["ann"]).unwrap();
    assert_eq!(client.commit().unwrap(), vec![Value::Int(90), Value::Int(1)]);

    let calls = client.driver().calls();
    assert_eq!(
        calls[0],
        Call::Execute {
            command: CommandKind::Watch,
            args: strings(&["balance"]),
        }
    );
    assert!(matches!(&calls[1], Call::Batch { atomic: true, commands } if commands.len() == 2));
}

#[test]
fn dbsize_queues_only_on_standalone() {
    let mut standalone = client(ScriptedDriver::new());
    standalone.begin_pipeline();
    assert_eq!(standalone.dbsize(None).unwrap(), Reply::Queued(0));

    let mut cluster = cluster_client(ScriptedDriver::new());
    cluster.begin_pipeline();
    let err = cluster.dbsize(Some(&Route::AllPrimaries)).unwrap_err();
    assert!(matches!(err, ClientError::NotAllowedInBatch { command: "DBSIZE" }));
    assert_eq!(cluster.queued(), 0);
}

#[test]
fn queue_chains_and_commits() {
    let driver = ScriptedDriver::new().batch_reply(vec![
        RawResponse::Int(1),
        RawResponse::Int(1),
        bulk("v"),
    ]);
    let mut client = client(driver);
    let results = client
        .begin_pipeline()
        .queue(
            CommandKind::HSet,
            CommandArgs::for_key(b"h").flat_pairs(["f", "v"]),
        )
        .unwrap()
        .queue(CommandKind::HLen, CommandArgs::for_key(b"h"))
        .unwrap()
        .queue(CommandKind::HGet, CommandArgs::for_key(b"h").field("f"))
        .unwrap()
        .commit()
        .unwrap();
    assert_eq!(results, vec![Value::Int(1), Value::Int(1), Value::from("v")]);
}

#[test]
fn queue_outside_batch_sends_nothing() {
    let mut client = client(ScriptedDriver::new());
    let err = client
        .queue(CommandKind::HLen, CommandArgs::for_key(b"h"))
        .unwrap_err();
    assert!(matches!(err, ClientError::NotBatching));
    assert!(client.driver().calls().is_empty());
}
