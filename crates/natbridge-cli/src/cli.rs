//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Natbridge CLI - translate NAT provisioning events between builder and connector schemas
///
/// Reads builder or connector events as JSON and emits the record on the
/// other side of the bridge, dispatching on the event's discriminator.
#[derive(Parser, Debug)]
#[command(
    name = "natbridge",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "NATBRIDGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results (defaults to the configured format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate events between the builder and connector schemas
    Translate(TranslateArgs),

    /// Report which schema an event would dispatch to, without translating
    Inspect(InspectArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the translate command
#[derive(Parser, Debug)]
pub struct TranslateArgs {
    /// Which way to translate
    #[arg(value_enum)]
    pub direction: DirectionArg,

    /// Input files; `-` or none reads standard input
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Write the translated record to a file instead of stdout
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,

    /// Show translation metadata
    #[arg(long)]
    pub show_metadata: bool,

    /// Emit empty output instead of failing on untranslatable input
    #[arg(long)]
    pub lossy: bool,

    /// How upstream AWS connector errors reach the builder
    #[arg(long, value_enum)]
    pub aws_errors: Option<AwsErrorsArg>,
}

/// Arguments for the inspect command
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Input file; `-` or none reads standard input
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init(ConfigInitArgs),

    /// Show the effective configuration
    Show(ConfigShowArgs),
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file (defaults to ./.natbridge.toml)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Force overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Translation direction
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    /// Builder event to provider connector event
    ToConnector,
    /// Provider connector event to builder event
    ToBuilder,
}

/// AWS connector error handling
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum AwsErrorsArg {
    /// Copy status, error_code and error_message unchanged
    Passthrough,
    /// Turn the legacy `error` key into an errored status
    Synthesize,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl From<DirectionArg> for natbridge_core::Direction {
    fn from(direction: DirectionArg) -> Self {
        match direction {
            DirectionArg::ToConnector => natbridge_core::Direction::BuilderToConnector,
            DirectionArg::ToBuilder => natbridge_core::Direction::ConnectorToBuilder,
        }
    }
}

impl From<AwsErrorsArg> for natbridge_core::AwsErrorPolicy {
    fn from(policy: AwsErrorsArg) -> Self {
        match policy {
            AwsErrorsArg::Passthrough => natbridge_core::AwsErrorPolicy::Passthrough,
            AwsErrorsArg::Synthesize => natbridge_core::AwsErrorPolicy::Synthesize,
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_translate_parsing() {
        let cli = Cli::parse_from([
            "natbridge",
            "-o",
            "json",
            "translate",
            "to-builder",
            "a.json",
            "b.json",
            "--aws-errors",
            "synthesize",
            "--lossy",
        ]);

        assert_eq!(cli.output, Some(OutputFormat::Json));
        match cli.command {
            Commands::Translate(args) => {
                assert_eq!(args.direction, DirectionArg::ToBuilder);
                assert_eq!(args.inputs, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
                assert_eq!(args.aws_errors, Some(AwsErrorsArg::Synthesize));
                assert!(args.lossy);
                assert!(!args.show_metadata);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::parse_from(["natbridge", "-vv", "inspect"]);
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli::parse_from(["natbridge", "--quiet", "inspect", "event.json"]);
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["natbridge", "-q", "-v", "inspect"]).is_err());
    }

    #[test]
    fn test_direction_conversion() {
        assert_eq!(
            natbridge_core::Direction::from(DirectionArg::ToConnector),
            natbridge_core::Direction::BuilderToConnector
        );
        assert_eq!(
            natbridge_core::AwsErrorPolicy::from(AwsErrorsArg::Passthrough),
            natbridge_core::AwsErrorPolicy::Passthrough
        );
    }
}
