//! Configuration management for the CLI
//!
//! Configuration comes from, in increasing precedence:
//! - Default values
//! - A configuration file (TOML, YAML or JSON)
//! - Command-line arguments

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use natbridge_core::{AwsErrorPolicy, TranslatorOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base names searched for a configuration file
const CONFIG_BASENAMES: &[&str] = &[".natbridge", "natbridge"];

/// Supported configuration file extensions, in search order
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "json"];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Translation settings
    pub translation: TranslationConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Translation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// How upstream AWS connector errors reach the builder
    pub aws_errors: AwsErrorPolicy,

    /// Pretty-print translated records
    pub pretty: bool,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (human, json, json-pretty, yaml)
    pub format: String,

    /// Use colored output by default
    pub color: bool,

    /// Show progress indicators
    pub progress: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (compact, full, json)
    pub format: String,

    /// Log file path
    pub file: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
            progress: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
            file: None,
        }
    }
}

/// File formats a configuration can be stored in
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Yaml,
    Json,
}

impl FileFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            Some("json") => FileFormat::Json,
            _ => FileFormat::Toml,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let config = match FileFormat::from_path(path) {
            FileFormat::Toml => toml::from_str(&content)?,
            FileFormat::Yaml => serde_yaml::from_str(&content)?,
            FileFormat::Json => serde_json::from_str(&content)?,
        };

        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to load config");
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Configuration file paths checked when none is given
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // Current directory
        for base in CONFIG_BASENAMES {
            for ext in CONFIG_EXTENSIONS {
                paths.push(PathBuf::from(format!("{}.{}", base, ext)));
            }
        }

        // User config directory
        if let Some(config_dir) = dirs::config_dir() {
            let natbridge_dir = config_dir.join("natbridge");
            for ext in CONFIG_EXTENSIONS {
                paths.push(natbridge_dir.join(format!("config.{}", ext)));
            }
        }

        // Home directory
        if let Some(home_dir) = dirs::home_dir() {
            for ext in CONFIG_EXTENSIONS {
                paths.push(home_dir.join(format!(".natbridge.{}", ext)));
            }
        }

        paths
    }

    /// Translator options derived from this configuration
    pub fn translator_options(&self) -> TranslatorOptions {
        TranslatorOptions {
            aws_errors: self.translation.aws_errors,
        }
    }

    /// The configured default output format
    pub fn output_format(&self) -> Result<OutputFormat> {
        match self.output.format.as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "json-pretty" => Ok(OutputFormat::JsonPretty),
            "yaml" => Ok(OutputFormat::Yaml),
            other => Err(Error::config(format!(
                "Unknown output.format '{}'. Expected human, json, json-pretty or yaml",
                other
            ))),
        }
    }

    /// Serialize the configuration for the given file path
    pub fn render(&self, path: &Path) -> Result<String> {
        Ok(match FileFormat::from_path(path) {
            FileFormat::Toml => toml::to_string_pretty(self)?,
            FileFormat::Yaml => serde_yaml::to_string(self)?,
            FileFormat::Json => serde_json::to_string_pretty(self)?,
        })
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.render(path)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}
