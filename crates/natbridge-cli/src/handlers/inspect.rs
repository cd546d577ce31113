//! Inspect command handler
//!
//! Reports which side of the bridge an event belongs to and which provider
//! its discriminator resolves to, without producing a translation.

use super::utils::InputSource;
use crate::cli::InspectArgs;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use natbridge_core::translation::discriminator::{canonical_token, is_legacy_token};
use natbridge_core::{Discriminator, Provider};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Which schema family an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Builder,
    Connector,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Builder => write!(f, "builder"),
            Side::Connector => write!(f, "connector"),
        }
    }
}

/// Dispatch report for one event
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Inspection {
    pub side: Option<Side>,
    /// The discriminator as it appears in the event, when it is a string
    pub discriminator: Option<String>,
    pub provider: Option<Provider>,
    pub canonical: Option<String>,
    pub legacy_token: bool,
    pub rule_count: usize,
}

/// Classify a decoded event
///
/// Connector events carry `_type`; builder events carry only `router_type`
/// (vCloud connector events have both, and `_type` wins).
pub fn inspect_value(value: &Value) -> Inspection {
    let (side, field, rules_key) = if value.get("_type").is_some() {
        (Side::Connector, "_type", "nat_rules")
    } else if value.get("router_type").is_some() {
        (Side::Builder, "router_type", "rules")
    } else {
        return Inspection::default();
    };

    let discriminator = value
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string);
    let provider = discriminator
        .as_deref()
        .and_then(|token| Discriminator::parse(token).provider());
    let canonical = match (&discriminator, provider) {
        (Some(token), Some(_)) => Some(canonical_token(token).to_string()),
        _ => None,
    };
    let legacy_token = discriminator.as_deref().is_some_and(is_legacy_token);
    let rule_count = value
        .get(rules_key)
        .and_then(Value::as_array)
        .map_or(0, Vec::len);

    Inspection {
        side: Some(side),
        discriminator,
        provider,
        canonical,
        legacy_token,
        rule_count,
    }
}

/// Handle the inspect command
pub fn handle_inspect(args: InspectArgs, output: &mut OutputWriter) -> Result<()> {
    let source = args
        .input
        .as_deref()
        .map_or(InputSource::Stdin, InputSource::from_path);
    let bytes = source.read()?;

    let value: Value = serde_json::from_slice(&bytes).map_err(|e| {
        tracing::debug!(input = %source.label(), error = %e, "Input is not JSON");
        Error::InvalidFormat {
            path: source.label().into(),
            expected: "JSON".to_string(),
        }
    })?;

    let inspection = inspect_value(&value);
    tracing::info!(
        input = %source.label(),
        side = ?inspection.side,
        provider = ?inspection.provider,
        "Inspected event"
    );

    output.inspection(&inspection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_builder_event() {
        let inspection = inspect_value(&json!({
            "router_type": "fake",
            "rules": [{"type": "dnat"}]
        }));

        assert_eq!(
            inspection,
            Inspection {
                side: Some(Side::Builder),
                discriminator: Some("fake".to_string()),
                provider: Some(Provider::VCloud),
                canonical: Some("fake".to_string()),
                legacy_token: false,
                rule_count: 1,
            }
        );
    }

    #[test]
    fn test_connector_event_with_legacy_token() {
        let inspection = inspect_value(&json!({"_type": "aws-fake", "router_type": "ignored"}));

        assert_eq!(inspection.side, Some(Side::Connector));
        assert_eq!(inspection.provider, Some(Provider::Aws));
        assert_eq!(inspection.canonical.as_deref(), Some("fake-aws"));
        assert!(inspection.legacy_token);
        assert_eq!(inspection.rule_count, 0);
    }

    #[test]
    fn test_unroutable_events() {
        let none = inspect_value(&json!({"name": "nat"}));
        assert_eq!(none.side, None);
        assert_eq!(none.discriminator, None);
        assert_eq!(none.provider, None);

        let wrong_type = inspect_value(&json!({"router_type": 7}));
        assert_eq!(wrong_type.side, Some(Side::Builder));
        assert_eq!(wrong_type.discriminator, None);

        let unknown = inspect_value(&json!({"_type": "VCLOUD"}));
        assert_eq!(unknown.provider, None);
        assert_eq!(unknown.canonical, None);
        assert!(!unknown.legacy_token);
    }
}
