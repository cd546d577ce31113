//! Discriminator tokens and the envelopes they are sniffed from
//!
//! Dispatch is a two-phase parse: a minimal envelope holding only the
//! discriminator is decoded first, then the full record for the matched
//! provider. The token sets are closed; anything else is `Unrecognized`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical vCloud tokens
pub const VCLOUD_TOKENS: &[&str] = &["vcloud", "fake-vcloud", "fake"];

/// Canonical AWS tokens
pub const AWS_TOKENS: &[&str] = &["aws", "fake-aws"];

/// Older spellings still emitted by some producers, with their canonical form
pub const LEGACY_ALIASES: &[(&str, &str)] = &[("vcloud-fake", "fake-vcloud"), ("aws-fake", "fake-aws")];

/// Connector provider a discriminator resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    VCloud,
    Aws,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::VCloud => write!(f, "vcloud"),
            Provider::Aws => write!(f, "aws"),
        }
    }
}

/// Result of reading a discriminator token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discriminator {
    VCloud,
    Aws,
    Unrecognized(String),
}

impl Discriminator {
    /// Classify a raw token. Matching is exact and case-sensitive.
    pub fn parse(token: &str) -> Self {
        let canonical = canonical_token(token);
        if VCLOUD_TOKENS.contains(&canonical) {
            Discriminator::VCloud
        } else if AWS_TOKENS.contains(&canonical) {
            Discriminator::Aws
        } else {
            Discriminator::Unrecognized(token.to_string())
        }
    }

    /// The provider this token selects, if any
    pub fn provider(&self) -> Option<Provider> {
        match self {
            Discriminator::VCloud => Some(Provider::VCloud),
            Discriminator::Aws => Some(Provider::Aws),
            Discriminator::Unrecognized(_) => None,
        }
    }
}

impl From<&str> for Discriminator {
    fn from(token: &str) -> Self {
        Discriminator::parse(token)
    }
}

/// Map a legacy spelling to its canonical token; other tokens pass through
pub fn canonical_token(token: &str) -> &str {
    LEGACY_ALIASES
        .iter()
        .find(|(legacy, _)| *legacy == token)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(token)
}

/// True when `token` is an accepted legacy spelling
pub fn is_legacy_token(token: &str) -> bool {
    LEGACY_ALIASES.iter().any(|(legacy, _)| *legacy == token)
}

/// Builder-side envelope: only the field that drives dispatch
#[derive(Debug, Default, Deserialize)]
pub(crate) struct BuilderEnvelope {
    #[serde(default)]
    pub router_type: Option<String>,
}

/// Connector-side envelope
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ConnectorEnvelope {
    #[serde(default, rename = "_type")]
    pub event_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_tokens() {
        for token in VCLOUD_TOKENS {
            assert_eq!(Discriminator::parse(token), Discriminator::VCloud);
        }
        for token in AWS_TOKENS {
            assert_eq!(Discriminator::parse(token), Discriminator::Aws);
        }
    }

    #[test]
    fn test_legacy_aliases_dispatch_like_canonical() {
        assert_eq!(Discriminator::parse("vcloud-fake"), Discriminator::VCloud);
        assert_eq!(Discriminator::parse("aws-fake"), Discriminator::Aws);
        assert!(is_legacy_token("aws-fake"));
        assert!(!is_legacy_token("fake-aws"));
        assert_eq!(canonical_token("vcloud-fake"), "fake-vcloud");
        assert_eq!(canonical_token("aws"), "aws");
    }

    #[test]
    fn test_unrecognized_tokens() {
        for token in ["", "VCLOUD", "azure", " aws", "fake-azure"] {
            assert_eq!(
                Discriminator::parse(token),
                Discriminator::Unrecognized(token.to_string())
            );
            assert_eq!(Discriminator::parse(token).provider(), None);
        }
    }

    #[test]
    fn test_envelopes_ignore_other_fields() {
        let envelope: BuilderEnvelope =
            serde_json::from_str(r#"{"router_type":"aws","rules":[1,2,3],"name":7}"#).unwrap();
        assert_eq!(envelope.router_type.as_deref(), Some("aws"));

        let envelope: ConnectorEnvelope = serde_json::from_str(r#"{"nat_name":"x"}"#).unwrap();
        assert_eq!(envelope.event_type, None);
    }

    #[test]
    fn test_provider_display() {
        assert_eq!(Provider::VCloud.to_string(), "vcloud");
        assert_eq!(Discriminator::Aws.provider(), Some(Provider::Aws));
    }
}
