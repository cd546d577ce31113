//! Translate command handler

use super::utils::InputSource;
use crate::cli::TranslateArgs;
use crate::config::Config;
use crate::error::{Error, ErrorContext, Result};
use crate::logging::{redaction, timing::Timer};
use crate::output::OutputWriter;
use natbridge_core::{Direction, Translation, Translator};
use std::fs;
use std::path::Path;

/// Handle the translate command
pub fn handle_translate(
    args: TranslateArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let direction = Direction::from(args.direction);
    let sources = InputSource::from_args(&args.inputs);

    if args.save_to.is_some() && sources.len() > 1 {
        return Err(Error::invalid_args(format!(
            "--save-to takes a single input, got {}",
            sources.len()
        )));
    }

    let mut options = config.translator_options();
    if let Some(policy) = args.aws_errors {
        options.aws_errors = policy.into();
    }
    let translator = Translator::with_options(options);

    let timer = Timer::with_details("translate", &direction.to_string());
    tracing::info!(
        %direction,
        inputs = sources.len(),
        aws_errors = ?options.aws_errors,
        "Translating events"
    );

    let progress = if sources.len() > 1 {
        output.progress_bar(sources.len() as u64, "Translating")
    } else {
        None
    };

    let mut translated = 0usize;
    for source in &sources {
        let bytes = source.read()?;

        match translator.translate(direction, &bytes) {
            Ok(translation) => {
                log_payload(&source.label(), &translation);
                match &args.save_to {
                    Some(path) => {
                        save_translation(&translation, path, config.translation.pretty)?;
                        output.success(&format!("✓ Saved translated record to {}", path.display()))?;
                    }
                    None => output.translation(&translation, args.show_metadata)?,
                }
                translated += 1;
            }
            Err(e) if args.lossy => {
                tracing::warn!(input = %source.label(), error = %e, "Untranslatable input, emitting empty output");
                if let Some(path) = &args.save_to {
                    fs::write(path, b"")
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                }
            }
            Err(e) => {
                tracing::error!(input = %source.label(), error = %e, "Translation failed");
                if let Some(pb) = &progress {
                    pb.abandon();
                }
                return Err(e.into());
            }
        }

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    tracing::debug!(
        translated,
        elapsed_us = u64::try_from(timer.elapsed().as_micros()).unwrap_or(u64::MAX),
        "Translation batch finished"
    );

    if sources.len() > 1 {
        output.info(&format!("Translated {} of {} events", translated, sources.len()))?;
    }

    Ok(())
}

/// Write the translated record to `path`
fn save_translation(translation: &Translation, path: &Path, pretty: bool) -> Result<()> {
    let mut content = if pretty {
        translation.to_pretty_string()?.into_bytes()
    } else {
        translation.to_bytes()?
    };
    content.push(b'\n');

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Trace the translated record with credentials masked
fn log_payload(input: &str, translation: &Translation) {
    if tracing::enabled!(tracing::Level::TRACE) {
        tracing::trace!(
            input,
            provider = %translation.metadata.provider,
            payload = %redaction::redacted(&translation.payload),
            "Translated record"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{AwsErrorsArg, DirectionArg, OutputFormat};
    use natbridge_core::AwsErrorPolicy;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn args(direction: DirectionArg, inputs: Vec<PathBuf>) -> TranslateArgs {
        TranslateArgs {
            direction,
            inputs,
            save_to: None,
            show_metadata: false,
            lossy: false,
            aws_errors: None,
        }
    }

    fn quiet_output() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Json, false, true, Box::new(std::io::sink()))
    }

    fn write_event(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
    }

    #[test]
    fn test_save_to_writes_record() {
        let dir = TempDir::new().unwrap();
        let input = write_event(
            &dir,
            "builder.json",
            r#"{"router_type":"aws","datacenter_name":"vpc-9","datacenter_token":"AKIA"}"#,
        );
        let saved = dir.path().join("out").join("connector.json");

        let mut translate_args = args(DirectionArg::ToConnector, vec![input]);
        translate_args.save_to = Some(saved.clone());
        handle_translate(translate_args, &Config::default(), &mut quiet_output()).unwrap();

        let record = read_json(&saved);
        assert_eq!(record["_type"], "aws");
        assert_eq!(record["datacenter_vpc_id"], "vpc-9");
        assert_eq!(record["datacenter_access_token"], "AKIA");
    }

    #[test]
    fn test_save_to_rejects_multiple_inputs() {
        let mut translate_args = args(
            DirectionArg::ToBuilder,
            vec![PathBuf::from("a.json"), PathBuf::from("b.json")],
        );
        translate_args.save_to = Some(PathBuf::from("out.json"));

        let err = handle_translate(translate_args, &Config::default(), &mut quiet_output())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgs(_)));
    }

    #[test]
    fn test_untranslatable_input_fails_unless_lossy() {
        let dir = TempDir::new().unwrap();
        let input = write_event(&dir, "azure.json", r#"{"_type":"azure"}"#);
        let saved = dir.path().join("out.json");

        let mut translate_args = args(DirectionArg::ToBuilder, vec![input.clone()]);
        translate_args.save_to = Some(saved.clone());
        let err = handle_translate(translate_args, &Config::default(), &mut quiet_output())
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(!saved.exists());

        let mut translate_args = args(DirectionArg::ToBuilder, vec![input]);
        translate_args.save_to = Some(saved.clone());
        translate_args.lossy = true;
        handle_translate(translate_args, &Config::default(), &mut quiet_output()).unwrap();
        assert_eq!(fs::read(&saved).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_aws_errors_flag_overrides_config() {
        let dir = TempDir::new().unwrap();
        let input = write_event(&dir, "aws.json", r#"{"_type":"aws","error":"quota exceeded"}"#);
        let saved = dir.path().join("builder.json");

        let mut config = Config::default();
        config.translation.aws_errors = AwsErrorPolicy::Passthrough;

        let mut translate_args = args(DirectionArg::ToBuilder, vec![input.clone()]);
        translate_args.save_to = Some(saved.clone());
        handle_translate(translate_args, &config, &mut quiet_output()).unwrap();
        assert_eq!(read_json(&saved)["error_message"], "");

        let mut translate_args = args(DirectionArg::ToBuilder, vec![input]);
        translate_args.save_to = Some(saved.clone());
        translate_args.aws_errors = Some(AwsErrorsArg::Synthesize);
        handle_translate(translate_args, &config, &mut quiet_output()).unwrap();
        assert_eq!(read_json(&saved)["error_message"], "quota exceeded");
    }

    #[test]
    fn test_pretty_config_formats_saved_record() {
        let dir = TempDir::new().unwrap();
        let input = write_event(&dir, "vcloud.json", r#"{"_type":"fake","nat_rules":null}"#);
        let saved = dir.path().join("builder.json");

        let mut config = Config::default();
        config.translation.pretty = true;

        let mut translate_args = args(DirectionArg::ToBuilder, vec![input]);
        translate_args.save_to = Some(saved.clone());
        handle_translate(translate_args, &config, &mut quiet_output()).unwrap();

        let content = fs::read_to_string(&saved).unwrap();
        assert!(content.contains("\n  \"router_type\""));
        assert_eq!(read_json(&saved)["rules"], serde_json::json!([]));
    }

    #[test]
    fn test_missing_input_file() {
        let translate_args = args(
            DirectionArg::ToConnector,
            vec![PathBuf::from("/nonexistent/event.json")],
        );
        let err = handle_translate(translate_args, &Config::default(), &mut quiet_output())
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
