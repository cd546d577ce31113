//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod completions;
mod config;
mod inspect;
mod translate;
mod utils;

pub use completions::handle_completions;
pub use config::handle_config;
pub use inspect::{handle_inspect, inspect_value, Inspection, Side};
pub use translate::handle_translate;
