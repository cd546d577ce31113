//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with specialized
//! support for translations, dispatch inspections and progress indicators.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::handlers::Inspection;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use natbridge_core::{Translation, TranslationMetadata};
use serde::Serialize;
use std::io::{self, Write};
use tracing::debug;

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a translation, optionally with its metadata
    fn format_translation(&self, translation: &Translation, show_metadata: bool) -> Result<String>;

    /// Format a dispatch inspection
    fn format_inspection(&self, inspection: &Inspection) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_translation(&self, translation: &Translation, show_metadata: bool) -> Result<String> {
        match (self, show_metadata) {
            (OutputFormat::Human, _) => format_translation_human(translation, show_metadata),
            (_, true) => self.format(translation),
            (_, false) => self.format(&translation.payload),
        }
    }

    fn format_inspection(&self, inspection: &Inspection) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_inspection_human(inspection)),
            _ => self.format(inspection),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, progress: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: progress && !quiet && io::stderr().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    #[cfg(test)]
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            show_progress: false, // No progress bars with custom writers
            quiet,
            writer,
        }
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a translation with specialized formatting
    pub fn translation(&mut self, translation: &Translation, show_metadata: bool) -> Result<()> {
        let formatted = self.format.format_translation(translation, show_metadata)?;
        self.emit(&formatted)
    }

    /// Write a dispatch inspection
    pub fn inspection(&mut self, inspection: &Inspection) -> Result<()> {
        let formatted = self.format.format_inspection(inspection)?;
        self.emit(&formatted)
    }

    // YAML already ends in a newline; everything else gets one
    fn emit(&mut self, formatted: &str) -> Result<()> {
        if formatted.ends_with('\n') {
            self.write(formatted)
        } else {
            self.writeln(formatted)
        }
    }

    /// Create a progress bar for batches of inputs
    pub fn progress_bar(&self, length: u64, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new(length);
        pb.set_style(default_progress_style());
        pb.set_message(message.to_string());
        Some(pb)
    }
}

/// Helper function to create a progress bar style
pub fn default_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

/// Format a translation for human reading
fn format_translation_human(translation: &Translation, show_metadata: bool) -> Result<String> {
    let mut output = String::new();

    if show_metadata {
        output.push_str("═══ Translation ═══\n\n");
        output.push_str(&format_translation_metadata_human(&translation.metadata));
        output.push('\n');
        output.push_str("📝 Record:\n");
    }

    output.push_str(&serde_json::to_string_pretty(&translation.payload)?);
    Ok(output)
}

/// Format translation metadata for human reading
fn format_translation_metadata_human(metadata: &TranslationMetadata) -> String {
    let mut output = String::new();

    output.push_str("🔧 Translation Details:\n");
    output.push_str(&format!("  Direction: {}\n", metadata.direction));
    output.push_str(&format!("  Provider: {}\n", metadata.provider));
    if metadata.legacy_token {
        output.push_str(&format!(
            "  Discriminator: {} (legacy spelling)\n",
            metadata.discriminator
        ));
    } else {
        output.push_str(&format!("  Discriminator: {}\n", metadata.discriminator));
    }
    output.push_str(&format!("  Timestamp: {}\n", metadata.timestamp));
    output.push_str(&format!("  Duration: {}µs\n", metadata.duration_us));

    output
}

/// Format an inspection for human reading
fn format_inspection_human(inspection: &Inspection) -> String {
    let mut output = String::new();

    match &inspection.side {
        Some(side) => output.push_str(&format!("📍 Side: {}\n", side)),
        None => output.push_str("📍 Side: unknown (no router_type or _type key)\n"),
    }

    if let Some(discriminator) = &inspection.discriminator {
        output.push_str(&format!("🏷️  Discriminator: {:?}\n", discriminator));
    }

    match (inspection.provider, &inspection.canonical) {
        (Some(provider), Some(canonical)) if inspection.legacy_token => output.push_str(&format!(
            "✅ Provider: {} (legacy spelling of {:?})\n",
            provider, canonical
        )),
        (Some(provider), _) => output.push_str(&format!("✅ Provider: {}\n", provider)),
        (None, _) => output.push_str("❌ Provider: none, translation would fail\n"),
    }

    output.push_str(&format!("📋 Rules: {}\n", inspection.rule_count));
    output
}
