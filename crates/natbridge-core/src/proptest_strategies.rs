//! Property-based testing strategies for generating test data
//!
//! This module provides proptest strategies for generating random
//! but valid instances of the record types.

#![cfg(test)]

use crate::translation::discriminator::{AWS_TOKENS, LEGACY_ALIASES, VCLOUD_TOKENS};
use crate::types::*;
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::sample::select;

/// Arbitrary printable field value, empty included
pub fn field_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ._:/@-]{0,24}"
}

/// Strategy for generating rules
pub fn rule_strategy() -> impl Strategy<Value = Rule> {
    (
        select(vec!["snat", "dnat", ""]),
        "[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}",
        "[0-9]{0,5}",
        "[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}",
        "[0-9]{0,5}",
        select(vec!["tcp", "udp", "any"]),
        field_strategy(),
    )
        .prop_map(
            |(rule_type, origin_ip, origin_port, translation_ip, translation_port, protocol, network)| Rule {
                rule_type: rule_type.to_string(),
                origin_ip,
                origin_port,
                translation_ip,
                translation_port,
                protocol: protocol.to_string(),
                network,
            },
        )
}

/// Any token that resolves to the vCloud schema
pub fn vcloud_token_strategy() -> impl Strategy<Value = String> {
    let mut tokens: Vec<&str> = VCLOUD_TOKENS.to_vec();
    tokens.push(LEGACY_ALIASES[0].0);
    select(tokens).prop_map(str::to_string)
}

/// Any token that resolves to the AWS schema
pub fn aws_token_strategy() -> impl Strategy<Value = String> {
    let mut tokens: Vec<&str> = AWS_TOKENS.to_vec();
    tokens.push(LEGACY_ALIASES[1].0);
    select(tokens).prop_map(str::to_string)
}

/// Strategy for builder events routed by `router_type`
pub fn builder_event_strategy(router_type: impl Strategy<Value = String>) -> impl Strategy<Value = BuilderEvent> {
    (
        (router_type, field_strategy(), field_strategy(), field_strategy()),
        (field_strategy(), vec(rule_strategy(), 0..6), field_strategy(), field_strategy()),
        (field_strategy(), field_strategy(), field_strategy(), field_strategy()),
        (field_strategy(), field_strategy(), field_strategy(), field_strategy()),
        (field_strategy(), field_strategy(), field_strategy(), field_strategy()),
        (field_strategy(), field_strategy(), field_strategy(), field_strategy()),
    )
        .prop_map(
            |(
                (router_type, uuid, batch_id, service),
                (name, rules, router_name, router_ip),
                (client_name, datacenter_name, datacenter_password, datacenter_region),
                (datacenter_type, datacenter_username, datacenter_access_token, datacenter_access_key),
                (network_name, nat_gateway_aws_id, network_aws_id, vcloud_url),
                (status, error_code, error_message, event_type),
            )| BuilderEvent {
                uuid,
                batch_id,
                event_type,
                service,
                name,
                rules,
                nat_type: String::new(),
                router_name,
                router_type,
                router_ip,
                client_name,
                datacenter_name,
                datacenter_password,
                datacenter_region,
                datacenter_type,
                datacenter_username,
                datacenter_access_token,
                datacenter_access_key,
                network_name,
                nat_gateway_aws_id,
                network_aws_id,
                vcloud_url,
                status,
                error_code,
                error_message,
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::{aws_to_builder, builder_to_aws, builder_to_vcloud, vcloud_to_builder};
    use crate::AwsErrorPolicy;

    proptest! {
        #[test]
        fn vcloud_mapping_round_trips(event in builder_event_strategy(vcloud_token_strategy())) {
            let back = vcloud_to_builder(&builder_to_vcloud(&event));

            prop_assert_eq!(&back.uuid, &event.uuid);
            prop_assert_eq!(&back.batch_id, &event.batch_id);
            prop_assert_eq!(&back.service, &event.service);
            prop_assert_eq!(&back.name, &event.name);
            prop_assert_eq!(&back.rules, &event.rules);
            prop_assert_eq!(&back.router_name, &event.router_name);
            prop_assert_eq!(&back.router_type, &event.router_type);
            prop_assert_eq!(&back.router_ip, &event.router_ip);
            prop_assert_eq!(&back.client_name, &event.client_name);
            prop_assert_eq!(&back.datacenter_name, &event.datacenter_name);
            prop_assert_eq!(&back.datacenter_password, &event.datacenter_password);
            prop_assert_eq!(&back.datacenter_region, &event.datacenter_region);
            prop_assert_eq!(&back.datacenter_type, &event.datacenter_type);
            prop_assert_eq!(&back.datacenter_username, &event.datacenter_username);
            prop_assert_eq!(&back.network_name, &event.network_name);
            prop_assert_eq!(&back.vcloud_url, &event.vcloud_url);
            prop_assert_eq!(&back.status, &event.status);
            prop_assert_eq!(&back.error_code, &event.error_code);
            prop_assert_eq!(&back.error_message, &event.error_message);
        }

        #[test]
        fn aws_mapping_never_touches_vcloud_fields(event in builder_event_strategy(aws_token_strategy())) {
            let back = aws_to_builder(&builder_to_aws(&event), AwsErrorPolicy::Passthrough);

            prop_assert_eq!(back.name, "");
            prop_assert_eq!(back.service, "");
            prop_assert!(back.rules.is_empty());
            prop_assert_eq!(back.router_name, "");
            prop_assert_eq!(back.router_ip, "");
            prop_assert_eq!(back.client_name, "");
            prop_assert_eq!(back.datacenter_password, "");
            prop_assert_eq!(back.datacenter_username, "");
            prop_assert_eq!(back.vcloud_url, "");
            prop_assert_eq!(&back.datacenter_name, &event.datacenter_name);
            prop_assert_eq!(&back.nat_gateway_aws_id, &event.nat_gateway_aws_id);
            prop_assert_eq!(&back.router_type, &event.router_type);
        }
    }
}
