//! Record shapes exchanged with the provisioning pipeline
//!
//! Field names follow the wire keys literally. Every field decodes to its
//! zero value when absent or `null` and is always emitted on output, so a
//! record never changes shape depending on which fields the source carried.

use serde::{Deserialize, Deserializer, Serialize};

/// One NAT translation entry, carried verbatim across every mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rule {
    /// Rule kind (e.g. "snat", "dnat")
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub rule_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub origin_ip: String,
    #[serde(deserialize_with = "null_as_default")]
    pub origin_port: String,
    #[serde(deserialize_with = "null_as_default")]
    pub translation_ip: String,
    #[serde(deserialize_with = "null_as_default")]
    pub translation_port: String,
    #[serde(deserialize_with = "null_as_default")]
    pub protocol: String,
    #[serde(deserialize_with = "null_as_default")]
    pub network: String,
}

/// The internal canonical NAT event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderEvent {
    #[serde(rename = "_uuid", deserialize_with = "null_as_default")]
    pub uuid: String,
    #[serde(rename = "_batch_id", deserialize_with = "null_as_default")]
    pub batch_id: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub event_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub service: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rules: Vec<Rule>,
    #[serde(deserialize_with = "null_as_default")]
    pub nat_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub router_name: String,
    /// Selects the connector schema on the builder side
    #[serde(deserialize_with = "null_as_default")]
    pub router_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub router_ip: String,
    #[serde(deserialize_with = "null_as_default")]
    pub client_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub datacenter_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub datacenter_password: String,
    #[serde(deserialize_with = "null_as_default")]
    pub datacenter_region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub datacenter_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub datacenter_username: String,
    #[serde(rename = "datacenter_token", deserialize_with = "null_as_default")]
    pub datacenter_access_token: String,
    #[serde(rename = "datacenter_secret", deserialize_with = "null_as_default")]
    pub datacenter_access_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub network_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub nat_gateway_aws_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub network_aws_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub vcloud_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub error_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub error_message: String,
}

/// vCloud connector wire shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VCloudEvent {
    #[serde(rename = "_uuid", deserialize_with = "null_as_default")]
    pub uuid: String,
    #[serde(rename = "_batch_id", deserialize_with = "null_as_default")]
    pub batch_id: String,
    /// Discriminator, copied from the builder's `router_type`
    #[serde(rename = "_type", deserialize_with = "null_as_default")]
    pub event_type: String,
    #[serde(rename = "service_id", deserialize_with = "null_as_default")]
    pub service: String,
    #[serde(rename = "nat_name", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "nat_rules", deserialize_with = "null_as_default")]
    pub rules: Vec<Rule>,
    #[serde(deserialize_with = "null_as_default")]
    pub router_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub router_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub router_ip: String,
    #[serde(deserialize_with = "null_as_default")]
    pub client_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub datacenter_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub datacenter_password: String,
    #[serde(deserialize_with = "null_as_default")]
    pub datacenter_region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub datacenter_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub datacenter_username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub network_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub vcloud_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub error_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub error_message: String,
}

/// AWS connector wire shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsEvent {
    #[serde(rename = "_uuid", deserialize_with = "null_as_default")]
    pub uuid: String,
    #[serde(rename = "_batch_id", deserialize_with = "null_as_default")]
    pub batch_id: String,
    #[serde(rename = "_type", deserialize_with = "null_as_default")]
    pub event_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub datacenter_region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub datacenter_access_token: String,
    #[serde(deserialize_with = "null_as_default")]
    pub datacenter_access_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub datacenter_vpc_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub nat_gateway_aws_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub network_aws_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub error_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub error_message: String,
    /// Upstream error reported by older AWS connectors. Read only.
    #[serde(rename = "error", skip_serializing, deserialize_with = "null_as_default")]
    pub legacy_error: String,
}

/// A connector record, already resolved to its provider schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConnectorEvent {
    VCloud(VCloudEvent),
    Aws(AwsEvent),
}

impl ConnectorEvent {
    /// The `_type` discriminator carried by the record
    pub fn event_type(&self) -> &str {
        match self {
            ConnectorEvent::VCloud(event) => &event.event_type,
            ConnectorEvent::Aws(event) => &event.event_type,
        }
    }

    pub fn uuid(&self) -> &str {
        match self {
            ConnectorEvent::VCloud(event) => &event.uuid,
            ConnectorEvent::Aws(event) => &event.uuid,
        }
    }
}

impl From<VCloudEvent> for ConnectorEvent {
    fn from(event: VCloudEvent) -> Self {
        ConnectorEvent::VCloud(event)
    }
}

impl From<AwsEvent> for ConnectorEvent {
    fn from(event: AwsEvent) -> Self {
        ConnectorEvent::Aws(event)
    }
}

/// Producers marshal empty strings and lists as `null`; treat that like an absent key
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
