//! Natbridge CLI - Command-line interface for NAT event translation
//!
//! This is the main entry point for the Natbridge CLI application, providing
//! commands for translating builder and connector events and inspecting how
//! they dispatch.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LogSettings};
use output::OutputWriter;
use std::process;
use tracing::instrument;
use tracing_appender::non_blocking::WorkerGuard;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Set up colored output
    control::set_override(cli.use_color());

    // Run the application; the log guard is dropped inside `run`
    let code = match run(cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            e.exit_code()
        }
    };

    process::exit(code);
}

/// Main application logic
fn run(cli: Cli) -> Result<()> {
    let config = Config::load_with_file(cli.config.as_deref())?;

    let _guard = init_logging(&cli, &config);
    execute(cli, &config)
}

#[instrument(skip_all, fields(command = ?cli.command))]
fn execute(cli: Cli, config: &Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = match cli.output {
        Some(format) => format,
        None => config.output_format()?,
    };
    let use_color = cli.use_color() && config.output.color;
    control::set_override(use_color);

    let mut output = OutputWriter::new(format, use_color, cli.quiet, config.output.progress);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        request_id = logging::current_request_id().unwrap_or("-"),
        "Executing command"
    );

    match cli.command {
        Commands::Translate(args) => handlers::handle_translate(args, config, &mut output),
        Commands::Inspect(args) => handlers::handle_inspect(args, &mut output),
        Commands::Config(args) => handlers::handle_config(args, config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Effective log settings from flags, config file and environment
fn log_settings(cli: &Cli, config: &Config) -> LogSettings {
    let verbosity = cli.verbosity_level();
    let mut settings = LogSettings::from_verbosity(verbosity);
    settings.merge_with_config(&config.logging, verbosity);
    settings.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        settings.level = "error".to_string();
        settings.console = false;
    }

    settings
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Option<WorkerGuard> {
    match logging::init_logging(log_settings(cli, config)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    }
}
