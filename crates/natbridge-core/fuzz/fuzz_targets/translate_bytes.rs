//! Fuzzing target for raw input bytes
//!
//! Both directions must accept arbitrary bytes without panicking, and any
//! successful translation must serialize to valid JSON.

#![no_main]

use libfuzzer_sys::fuzz_target;
use natbridge_core::{AwsErrorPolicy, Translator, TranslatorOptions};

fuzz_target!(|data: &[u8]| {
    for policy in [AwsErrorPolicy::Passthrough, AwsErrorPolicy::Synthesize] {
        let translator = Translator::with_options(TranslatorOptions { aws_errors: policy });

        for result in [
            translator.builder_to_connector(data),
            translator.connector_to_builder(data),
        ] {
            if let Ok(translation) = result {
                let bytes = translation.to_bytes().expect("translated payload serializes");
                let _: serde_json::Value =
                    serde_json::from_slice(&bytes).expect("translated payload is valid JSON");
            }
        }

        // The lossy entry points never panic either
        let _ = translator.builder_to_connector_bytes(data);
        let _ = translator.connector_to_builder_bytes(data);
    }
});
