//! Translation engine between builder events and provider connector events
//!
//! Both directions follow the same steps: sniff the discriminator from a
//! minimal envelope, resolve it to a provider, decode the full source record
//! for that provider, copy fields across, and serialize.

pub mod aws;
pub mod discriminator;
pub mod vcloud;

use crate::error::{Direction, Error, Result};
use crate::types::{AwsEvent, BuilderEvent, ConnectorEvent, VCloudEvent};
use discriminator::{BuilderEnvelope, ConnectorEnvelope};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

pub use aws::{aws_to_builder, builder_to_aws};
pub use discriminator::{Discriminator, Provider};
pub use vcloud::{builder_to_vcloud, vcloud_to_builder};

/// How upstream errors reported by AWS connectors reach the builder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwsErrorPolicy {
    /// Copy `status`, `error_code` and `error_message` unchanged
    #[default]
    Passthrough,
    /// Turn a non-empty legacy `error` key into an errored builder status
    Synthesize,
}

/// Options fixed for the lifetime of a [`Translator`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorOptions {
    pub aws_errors: AwsErrorPolicy,
}

/// Metadata about one translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationMetadata {
    pub direction: Direction,
    pub provider: Provider,
    /// The discriminator exactly as it appeared in the input
    pub discriminator: String,
    /// Whether the discriminator used a legacy spelling
    pub legacy_token: bool,
    /// RFC 3339 timestamp of the translation
    pub timestamp: String,
    pub duration_us: u64,
}

/// A translated record plus metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub payload: Value,
    pub metadata: TranslationMetadata,
}

impl Translation {
    /// Compact JSON bytes of the translated record
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.payload).map_err(|e| Error::serialize(self.metadata.direction, e))
    }

    pub fn to_pretty_string(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.payload)
            .map_err(|e| Error::serialize(self.metadata.direction, e))
    }
}

/// Stateless builder <-> connector translator
///
/// A `Translator` holds only immutable options, so one instance can be
/// shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    options: TranslatorOptions,
}

impl Translator {
    /// Translator with default options (AWS errors passed through)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TranslatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> TranslatorOptions {
        self.options
    }

    /// Translate in the given direction
    pub fn translate(&self, direction: Direction, input: &[u8]) -> Result<Translation> {
        match direction {
            Direction::BuilderToConnector => self.builder_to_connector(input),
            Direction::ConnectorToBuilder => self.connector_to_builder(input),
        }
    }

    /// Translate a builder event into the connector schema its
    /// `router_type` selects
    ///
    /// # Errors
    ///
    /// - [`Error::Parse`] when the input is not a builder event
    /// - [`Error::NoMatchingSchema`] when `router_type` is absent or unknown
    pub fn builder_to_connector(&self, input: &[u8]) -> Result<Translation> {
        let start = Instant::now();
        let direction = Direction::BuilderToConnector;

        let envelope: BuilderEnvelope =
            serde_json::from_slice(input).map_err(|e| Error::parse(direction, e))?;
        let token = envelope.router_type.unwrap_or_default();
        let provider = resolve(direction, &token)?;

        let event: BuilderEvent =
            serde_json::from_slice(input).map_err(|e| Error::parse(direction, e))?;
        let output = match provider {
            Provider::VCloud => ConnectorEvent::VCloud(builder_to_vcloud(&event)),
            Provider::Aws => ConnectorEvent::Aws(builder_to_aws(&event)),
        };

        finish(direction, provider, token, &output, start)
    }

    /// Translate a connector event back into a builder event
    ///
    /// # Errors
    ///
    /// - [`Error::Parse`] when the input is not a connector event
    /// - [`Error::NoMatchingSchema`] when `_type` is absent or unknown
    pub fn connector_to_builder(&self, input: &[u8]) -> Result<Translation> {
        let start = Instant::now();
        let direction = Direction::ConnectorToBuilder;

        let envelope: ConnectorEnvelope =
            serde_json::from_slice(input).map_err(|e| Error::parse(direction, e))?;
        let token = envelope.event_type.unwrap_or_default();
        let provider = resolve(direction, &token)?;

        let event = match provider {
            Provider::VCloud => ConnectorEvent::VCloud(
                serde_json::from_slice::<VCloudEvent>(input).map_err(|e| Error::parse(direction, e))?,
            ),
            Provider::Aws => ConnectorEvent::Aws(
                serde_json::from_slice::<AwsEvent>(input).map_err(|e| Error::parse(direction, e))?,
            ),
        };
        let output = self.to_builder(&event);

        finish(direction, provider, token, &output, start)
    }

    /// Byte-level builder -> connector: empty output when untranslatable
    pub fn builder_to_connector_bytes(&self, input: &[u8]) -> Vec<u8> {
        lossy(self.builder_to_connector(input))
    }

    /// Byte-level connector -> builder: empty output when untranslatable
    pub fn connector_to_builder_bytes(&self, input: &[u8]) -> Vec<u8> {
        lossy(self.connector_to_builder(input))
    }

    /// Map an already-decoded builder event
    pub fn to_connector(&self, event: &BuilderEvent) -> Result<ConnectorEvent> {
        let direction = Direction::BuilderToConnector;
        match resolve(direction, &event.router_type)? {
            Provider::VCloud => Ok(ConnectorEvent::VCloud(builder_to_vcloud(event))),
            Provider::Aws => Ok(ConnectorEvent::Aws(builder_to_aws(event))),
        }
    }

    /// Map an already-resolved connector event
    pub fn to_builder(&self, event: &ConnectorEvent) -> BuilderEvent {
        match event {
            ConnectorEvent::VCloud(event) => vcloud_to_builder(event),
            ConnectorEvent::Aws(event) => aws_to_builder(event, self.options.aws_errors),
        }
    }
}

/// Resolve a discriminator token for `direction`, warning on legacy spellings
fn resolve(direction: Direction, token: &str) -> Result<Provider> {
    let Some(provider) = Discriminator::parse(token).provider() else {
        tracing::debug!(%direction, token, "No mapping for discriminator");
        return Err(Error::NoMatchingSchema {
            direction,
            field: direction.discriminator_field(),
            value: token.to_string(),
        });
    };

    if discriminator::is_legacy_token(token) {
        tracing::warn!(
            %direction,
            token,
            canonical = discriminator::canonical_token(token),
            "Legacy discriminator spelling"
        );
    }
    tracing::debug!(%direction, token, %provider, "Dispatching translation");
    Ok(provider)
}

fn finish<T: Serialize>(
    direction: Direction,
    provider: Provider,
    token: String,
    output: &T,
    start: Instant,
) -> Result<Translation> {
    let payload = serde_json::to_value(output).map_err(|e| Error::serialize(direction, e))?;
    let legacy_token = discriminator::is_legacy_token(&token);

    Ok(Translation {
        payload,
        metadata: TranslationMetadata {
            direction,
            provider,
            discriminator: token,
            legacy_token,
            timestamp: chrono::Utc::now().to_rfc3339(),
            duration_us: u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX),
        },
    })
}

fn lossy(result: Result<Translation>) -> Vec<u8> {
    match result.and_then(|translation| translation.to_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(error = %e, "Translation produced no output");
            Vec::new()
        }
    }
}
