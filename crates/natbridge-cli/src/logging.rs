//! Logging utilities for the Natbridge CLI
//!
//! This module provides:
//! - Structured logging setup (console on stderr, optional file)
//! - Request ID generation and tracking
//! - Credential redaction for logged payloads
//! - Performance timing spans

use crate::config::LoggingConfig;
use crate::error::{Error, Result};
use is_terminal::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{field, Span};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};
use uuid::Uuid;

/// Global request ID for the current session
static REQUEST_ID: OnceLock<String> = OnceLock::new();

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Effective logging settings after verbosity, config file and environment
#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    /// Log level filter
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Enable console output (stderr)
    pub console: bool,
    /// Optional file output path
    pub file: Option<PathBuf>,
    /// Include thread IDs
    pub thread_ids: bool,
    /// Include file and line numbers
    pub source_location: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact format for everyday use
    Compact,
    /// Full format with all details
    Full,
    /// JSON structured format
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "compact" => Some(LogFormat::Compact),
            "full" => Some(LogFormat::Full),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            console: true,
            file: None,
            thread_ids: false,
            source_location: false,
        }
    }
}

impl LogSettings {
    /// Create logging settings from verbosity level
    pub fn from_verbosity(verbosity: u8) -> Self {
        let mut settings = Self::default();

        match verbosity {
            0 => {}
            1 => {
                settings.level = "info".to_string();
            }
            2 => {
                settings.level = "debug".to_string();
                settings.source_location = true;
            }
            _ => {
                settings.level = "trace".to_string();
                settings.format = LogFormat::Full;
                settings.source_location = true;
                settings.thread_ids = true;
            }
        }

        settings
    }

    /// Apply the `[logging]` section of the config file
    ///
    /// The configured level only applies when no `-v` flag was given.
    pub fn merge_with_config(&mut self, config: &LoggingConfig, verbosity: u8) {
        if verbosity == 0 {
            self.level = config.level.clone();
        }
        match LogFormat::parse(&config.format) {
            Some(format) => self.format = format,
            None => eprintln!("Warning: Invalid log format '{}', using default", config.format),
        }
        if config.file.is_some() {
            self.file = config.file.clone();
        }
    }

    /// Apply environment overrides
    pub fn merge_with_env(&mut self) {
        if let Ok(format) = std::env::var("NATBRIDGE_LOG_FORMAT") {
            match LogFormat::parse(&format) {
                Some(format) => self.format = format,
                None => eprintln!("Warning: Invalid NATBRIDGE_LOG_FORMAT '{}', using default", format),
            }
        }

        if let Ok(file) = std::env::var("NATBRIDGE_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }

        if let Ok(console) = std::env::var("NATBRIDGE_LOG_CONSOLE") {
            self.console = console.eq_ignore_ascii_case("true") || console == "1";
        }
    }
}

/// Initialize the global logging system
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process.
pub fn init_logging(settings: LogSettings) -> Result<Option<WorkerGuard>> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    if settings.console {
        layers.push(console_layer(&settings)?);
    }

    if let Some(path) = &settings.file {
        let (layer, file_guard) = file_layer(&settings, path)?;
        layers.push(layer);
        guard = Some(file_guard);
    }

    let subscriber = tracing_subscriber::registry().with(layers);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;

    let request_id = generate_request_id();
    REQUEST_ID.set(request_id.clone()).map_err(|_| {
        Error::other("Failed to set request ID - request tracking may not work correctly")
    })?;

    tracing::info!(
        request_id = %request_id,
        settings = ?settings,
        "Logging system initialized"
    );

    Ok(guard)
}

fn console_layer(settings: &LogSettings) -> Result<BoxedLayer> {
    let ansi = std::io::stderr().is_terminal();
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(settings.thread_ids)
        .with_file(settings.source_location)
        .with_line_number(settings.source_location);
    let filter = create_env_filter(settings)?;

    Ok(match settings.format {
        LogFormat::Compact => layer.with_ansi(ansi).compact().with_filter(filter).boxed(),
        LogFormat::Full => layer.with_ansi(ansi).with_filter(filter).boxed(),
        LogFormat::Json => layer.with_ansi(false).json().with_filter(filter).boxed(),
    })
}

fn file_layer(settings: &LogSettings, path: &Path) -> Result<(BoxedLayer, WorkerGuard)> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::config(format!("Invalid log file path: {}", path.display())))?;
    std::fs::create_dir_all(directory)?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(settings.thread_ids)
        .with_file(settings.source_location)
        .with_line_number(settings.source_location);
    let filter = create_env_filter(settings)?;

    let layer = match settings.format {
        LogFormat::Json => layer.json().with_filter(filter).boxed(),
        LogFormat::Compact => layer.compact().with_filter(filter).boxed(),
        LogFormat::Full => layer.with_filter(filter).boxed(),
    };
    Ok((layer, guard))
}

/// Create environment filter based on settings; `RUST_LOG` takes precedence
fn create_env_filter(settings: &LogSettings) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.level)
            .map_err(|e| Error::config(format!("Invalid log level '{}': {}", settings.level, e))),
    }
}

/// Generate a unique request ID for this session
pub fn generate_request_id() -> String {
    format!("req_{}", Uuid::new_v4().simple())
}

/// Get the current request ID
pub fn current_request_id() -> Option<&'static str> {
    REQUEST_ID.get().map(|s| s.as_str())
}

/// Create a span with request ID and timing
pub fn create_operation_span(operation: &str, details: Option<&str>) -> Span {
    tracing::info_span!(
        "operation",
        operation = operation,
        request_id = current_request_id().unwrap_or("unknown"),
        details = details.unwrap_or(""),
        duration_ms = field::Empty,
    )
}

/// Credential redaction for logged payloads
pub mod redaction {
    use regex::Regex;
    use serde_json::Value;
    use std::sync::OnceLock;

    static CREDENTIAL_REGEX: OnceLock<Regex> = OnceLock::new();

    fn credential_regex() -> &'static Regex {
        CREDENTIAL_REGEX.get_or_init(|| {
            Regex::new(r#"(?i)(password|passwd|secret|token|access[_-]?key)[=:\s]+['"]?([^\s'",]{3,})['"]?"#)
                .expect("credential pattern is a valid regex")
        })
    }

    /// Redact `key=value` style credentials from free text
    pub fn redact_sensitive(input: &str) -> String {
        credential_regex().replace_all(input, "$1=***").to_string()
    }

    /// Redact credential fields anywhere in a JSON value
    pub fn redact_json_value(value: &mut Value) {
        match value {
            Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    if is_sensitive_key(key) {
                        if !matches!(val, Value::String(s) if s.is_empty()) {
                            *val = Value::String("***".to_string());
                        }
                    } else {
                        redact_json_value(val);
                    }
                }
            }
            Value::Array(arr) => {
                for item in arr.iter_mut() {
                    redact_json_value(item);
                }
            }
            Value::String(s) => {
                *s = redact_sensitive(s);
            }
            _ => {}
        }
    }

    /// A redacted copy of `value`
    pub fn redacted(value: &Value) -> Value {
        let mut copy = value.clone();
        redact_json_value(&mut copy);
        copy
    }

    /// Check if a JSON key holds a credential
    ///
    /// Covers `datacenter_password`, `datacenter_token`, `datacenter_secret`,
    /// `datacenter_access_token` and `datacenter_access_key`.
    fn is_sensitive_key(key: &str) -> bool {
        let key_lower = key.to_lowercase();
        key_lower.contains("key")
            || key_lower.contains("token")
            || key_lower.contains("password")
            || key_lower.contains("passwd")
            || key_lower.contains("secret")
            || key_lower.contains("credential")
    }
}

/// Performance timing utilities
pub mod timing {
    use std::time::Instant;
    use tracing::Span;

    /// A timer that records its duration when dropped
    pub struct Timer {
        start: Instant,
        span: Span,
        operation: String,
    }

    impl Timer {
        pub fn new(operation: &str) -> Self {
            Self::build(operation, None)
        }

        pub fn with_details(operation: &str, details: &str) -> Self {
            Self::build(operation, Some(details))
        }

        fn build(operation: &str, details: Option<&str>) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation, details),
                operation: operation.to_string(),
            }
        }

        /// Get elapsed time without finishing the timer
        pub fn elapsed(&self) -> std::time::Duration {
            self.start.elapsed()
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            let duration_ms = u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX);
            self.span.record("duration_ms", duration_ms);

            tracing::debug!(
                operation = %self.operation,
                duration_ms,
                "Operation completed"
            );
        }
    }
}
