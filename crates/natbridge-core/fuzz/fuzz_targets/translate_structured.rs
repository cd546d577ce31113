//! Fuzzing target for well-formed events with fuzzed field values
//!
//! Raw bytes rarely get past the JSON parser, so this target wraps fuzzed
//! strings into otherwise valid events and checks the round trip.

#![no_main]

use libfuzzer_sys::fuzz_target;
use natbridge_core::Translator;
use serde_json::json;

const TOKENS: &[&str] = &["vcloud", "fake-vcloud", "fake", "vcloud-fake", "aws", "fake-aws", "aws-fake"];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let text = String::from_utf8_lossy(rest).into_owned();
    let token = TOKENS[selector as usize % TOKENS.len()];

    let input = json!({
        "_uuid": text,
        "router_type": token,
        "name": text,
        "datacenter_name": text,
        "rules": [{"type": text, "origin_ip": text}],
    });
    let bytes = serde_json::to_vec(&input).expect("event serializes");

    let translator = Translator::new();
    let connector = translator
        .builder_to_connector(&bytes)
        .expect("known token always translates");
    let connector_bytes = connector.to_bytes().expect("payload serializes");
    let builder = translator
        .connector_to_builder(&connector_bytes)
        .expect("connector output translates back");

    assert_eq!(builder.payload["_uuid"], input["_uuid"]);
    assert_eq!(builder.payload["datacenter_name"], input["datacenter_name"]);
});
