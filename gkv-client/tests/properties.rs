mod support;

use gkv_client::{compose, CommandArgs, Condition, Expiry, Grammar, RawResponse, Reply, Value};
use proptest::prelude::*;

use support::*;

proptest! {
    #[test]
    fn field_expire_layout_is_deterministic(
        fields in proptest::collection::vec("[a-z]{1,8}", 1..12),
        seconds in 1i64..1_000_000,
    ) {
        let args = CommandArgs::for_key(b"key")
            .fields(fields.iter().map(String::as_str))
            .condition(Some(Condition::Xx))
            .expiry(Some(Expiry::seconds(seconds)));

        let first = compose(Grammar::FieldExpire, &args).unwrap().to_strings_lossy();
        let second = compose(Grammar::FieldExpire, &args).unwrap().to_strings_lossy();
        prop_assert_eq!(&first, &second);

        let mut expected = vec![
            "key".to_string(),
            seconds.to_string(),
            "XX".to_string(),
            "FIELDS".to_string(),
            fields.len().to_string(),
        ];
        expected.extend(fields.iter().cloned());
        prop_assert_eq!(first, expected);
    }

    #[test]
    fn field_expiry_set_counts_pairs(
        entries in proptest::collection::vec(("[a-z]{1,6}", "[0-9]{0,4}"), 1..10),
    ) {
        let args = CommandArgs::for_key(b"key")
            .map(entries.iter().map(|(field, value)| (field.as_str(), value.as_str())));
        let tokens = compose(Grammar::FieldExpirySet, &args).unwrap().to_strings_lossy();

        prop_assert_eq!(tokens.len(), 3 + entries.len() * 2);
        prop_assert_eq!(&tokens[1], "FIELDS");
        prop_assert_eq!(tokens[2].clone(), entries.len().to_string());
    }

    #[test]
    fn commit_returns_one_result_per_command_in_order(count in 1usize..48) {
        let replies: Vec<RawResponse> = (0..count as i64).map(RawResponse::Int).collect();
        let mut client = client(ScriptedDriver::new().batch_reply(replies));
        client.begin_pipeline();
        for index in 0..count {
            let key = format!("k{}", index);
            prop_assert_eq!(client.hlen(key.as_bytes()).unwrap(), Reply::Queued(index));
        }

        let results = client.commit().unwrap();
        let expected: Vec<Value> = (0..count as i64).map(Value::Int).collect();
        prop_assert_eq!(results, expected);
    }
}
