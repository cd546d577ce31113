//! Builder <-> AWS connector field mapping

use super::AwsErrorPolicy;
use crate::types::{AwsEvent, BuilderEvent};

/// Status written when an AWS connector reports an upstream error
pub const ERRORED_STATUS: &str = "errored";

/// Error code paired with [`ERRORED_STATUS`]
pub const ERRORED_CODE: &str = "0";

/// Map a builder event onto the AWS connector schema
///
/// Only credentials, region and network identifiers cross over; names,
/// rules and router fields have no AWS counterpart.
pub fn builder_to_aws(input: &BuilderEvent) -> AwsEvent {
    AwsEvent {
        uuid: input.uuid.clone(),
        batch_id: input.batch_id.clone(),
        event_type: input.router_type.clone(),
        datacenter_region: input.datacenter_region.clone(),
        datacenter_access_token: input.datacenter_access_token.clone(),
        datacenter_access_key: input.datacenter_access_key.clone(),
        datacenter_vpc_id: input.datacenter_name.clone(),
        nat_gateway_aws_id: input.nat_gateway_aws_id.clone(),
        network_aws_id: input.network_aws_id.clone(),
        status: input.status.clone(),
        error_code: input.error_code.clone(),
        error_message: input.error_message.clone(),
        legacy_error: String::new(),
    }
}

/// Map an AWS connector event back onto the builder schema
///
/// The AWS record has no router type of its own, so `_type` fills both the
/// builder's `type` and `router_type`.
pub fn aws_to_builder(input: &AwsEvent, policy: AwsErrorPolicy) -> BuilderEvent {
    let mut output = BuilderEvent {
        uuid: input.uuid.clone(),
        batch_id: input.batch_id.clone(),
        event_type: input.event_type.clone(),
        router_type: input.event_type.clone(),
        datacenter_region: input.datacenter_region.clone(),
        datacenter_access_token: input.datacenter_access_token.clone(),
        datacenter_access_key: input.datacenter_access_key.clone(),
        datacenter_name: input.datacenter_vpc_id.clone(),
        nat_gateway_aws_id: input.nat_gateway_aws_id.clone(),
        network_aws_id: input.network_aws_id.clone(),
        status: input.status.clone(),
        error_code: input.error_code.clone(),
        error_message: input.error_message.clone(),
        ..BuilderEvent::default()
    };

    if policy == AwsErrorPolicy::Synthesize && !input.legacy_error.is_empty() {
        tracing::debug!(
            uuid = %input.uuid,
            "Synthesizing errored builder status from AWS connector error"
        );
        output.status = ERRORED_STATUS.to_string();
        output.error_code = ERRORED_CODE.to_string();
        output.error_message = input.legacy_error.clone();
    }

    output
}
