//! Natbridge Core - NAT event translation between builder and connector schemas
//!
//! This crate translates NAT provisioning events between the internal
//! "builder" format and the provider-specific "connector" formats used by
//! the vCloud and AWS connectors.
//!
//! # Main Components
//!
//! - **Record Types**: [`BuilderEvent`], [`VCloudEvent`], [`AwsEvent`] and [`Rule`]
//! - **Dispatch**: discriminator tokens resolved to a closed [`Provider`] set
//! - **Mappings**: field-by-field copies per provider and direction
//! - **Error Handling**: explicit parse and no-matching-schema states
//!
//! # Example
//!
//! ```
//! use natbridge_core::{Translator, Result};
//!
//! fn example() -> Result<()> {
//!     let input = br#"{"router_type":"aws","datacenter_name":"dc1","nat_gateway_aws_id":"nat-123"}"#;
//!     let translation = Translator::new().builder_to_connector(input)?;
//!     assert_eq!(translation.payload["datacenter_vpc_id"], "dc1");
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod error;
pub mod translation;
pub mod types;

#[cfg(test)]
mod proptest_strategies;

// Re-export main types for convenience
pub use error::{Direction, Error, Result};
pub use translation::{
    AwsErrorPolicy, Discriminator, Provider, Translation, TranslationMetadata, Translator,
    TranslatorOptions,
};
pub use types::{AwsEvent, BuilderEvent, ConnectorEvent, Rule, VCloudEvent};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Translate a builder event with default options
pub fn builder_to_connector(input: &[u8]) -> Result<Translation> {
    Translator::new().builder_to_connector(input)
}

/// Translate a connector event with default options
pub fn connector_to_builder(input: &[u8]) -> Result<Translation> {
    Translator::new().connector_to_builder(input)
}
