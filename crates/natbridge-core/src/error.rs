//! Error types for the Natbridge core library
//!
//! Every translation either yields a record or one of the explicit failure
//! states below. Nothing is swallowed inside the core; the lossy byte-level
//! entry points on [`crate::Translator`] are the only place errors collapse
//! into empty output.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for Natbridge operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input bytes are not a JSON object of the expected shape
    #[error("Failed to parse {direction} input: {message}")]
    Parse {
        direction: Direction,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// The discriminator is absent or names no known provider
    #[error("No {direction} mapping for {field}={value:?}")]
    NoMatchingSchema {
        direction: Direction,
        field: &'static str,
        value: String,
    },

    /// The destination record could not be serialized
    #[error("Failed to serialize {direction} output: {message}")]
    Serialize {
        direction: Direction,
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Which way a translation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Internal builder event to provider connector event
    BuilderToConnector,
    /// Provider connector event back to builder event
    ConnectorToBuilder,
}

impl Direction {
    /// The discriminator key read on the source side
    pub fn discriminator_field(self) -> &'static str {
        match self {
            Direction::BuilderToConnector => "router_type",
            Direction::ConnectorToBuilder => "_type",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::BuilderToConnector => write!(f, "builder-to-connector"),
            Direction::ConnectorToBuilder => write!(f, "connector-to-builder"),
        }
    }
}

impl Error {
    pub(crate) fn parse(direction: Direction, source: serde_json::Error) -> Self {
        Error::Parse {
            direction,
            message: source.to_string(),
            source,
        }
    }

    pub(crate) fn serialize(direction: Direction, source: serde_json::Error) -> Self {
        Error::Serialize {
            direction,
            message: source.to_string(),
            source,
        }
    }

    /// True when the input was well-formed but no provider schema applies
    pub fn is_untranslatable(&self) -> bool {
        matches!(self, Error::NoMatchingSchema { .. })
    }

    /// Direction of the failed translation
    pub fn direction(&self) -> Direction {
        match self {
            Error::Parse { direction, .. }
            | Error::NoMatchingSchema { direction, .. }
            | Error::Serialize { direction, .. } => *direction,
        }
    }
}
