//! Builder <-> vCloud connector field mapping
//!
//! Copying is total: every destination field is assigned, possibly from an
//! empty source value.

use crate::types::{BuilderEvent, VCloudEvent};

/// Map a builder event onto the vCloud connector schema
pub fn builder_to_vcloud(input: &BuilderEvent) -> VCloudEvent {
    VCloudEvent {
        uuid: input.uuid.clone(),
        batch_id: input.batch_id.clone(),
        event_type: input.router_type.clone(),
        service: input.service.clone(),
        name: input.name.clone(),
        rules: input.rules.clone(),
        router_name: input.router_name.clone(),
        router_type: input.router_type.clone(),
        router_ip: input.router_ip.clone(),
        client_name: input.client_name.clone(),
        datacenter_name: input.datacenter_name.clone(),
        datacenter_password: input.datacenter_password.clone(),
        datacenter_region: input.datacenter_region.clone(),
        datacenter_type: input.datacenter_type.clone(),
        datacenter_username: input.datacenter_username.clone(),
        network_name: input.network_name.clone(),
        vcloud_url: input.vcloud_url.clone(),
        status: input.status.clone(),
        error_code: input.error_code.clone(),
        error_message: input.error_message.clone(),
    }
}

/// Map a vCloud connector event back onto the builder schema
///
/// `_type` lands in the builder's `type`; the builder's `router_type` comes
/// from the connector's own `router_type` so it round-trips unchanged.
pub fn vcloud_to_builder(input: &VCloudEvent) -> BuilderEvent {
    BuilderEvent {
        uuid: input.uuid.clone(),
        batch_id: input.batch_id.clone(),
        event_type: input.event_type.clone(),
        service: input.service.clone(),
        name: input.name.clone(),
        rules: input.rules.clone(),
        router_name: input.router_name.clone(),
        router_type: input.router_type.clone(),
        router_ip: input.router_ip.clone(),
        client_name: input.client_name.clone(),
        datacenter_name: input.datacenter_name.clone(),
        datacenter_password: input.datacenter_password.clone(),
        datacenter_region: input.datacenter_region.clone(),
        datacenter_type: input.datacenter_type.clone(),
        datacenter_username: input.datacenter_username.clone(),
        network_name: input.network_name.clone(),
        vcloud_url: input.vcloud_url.clone(),
        status: input.status.clone(),
        error_code: input.error_code.clone(),
        error_message: input.error_message.clone(),
        ..BuilderEvent::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rule;

    fn sample_builder() -> BuilderEvent {
        BuilderEvent {
            uuid: "2f1c".to_string(),
            batch_id: "batch-9".to_string(),
            event_type: "nat.create".to_string(),
            service: "svc-1".to_string(),
            name: "nat1".to_string(),
            rules: vec![
                Rule {
                    rule_type: "dnat".to_string(),
                    origin_ip: "1.2.3.4".to_string(),
                    origin_port: "80".to_string(),
                    translation_ip: "10.0.0.1".to_string(),
                    translation_port: "8080".to_string(),
                    protocol: "tcp".to_string(),
                    network: "web".to_string(),
                },
                Rule {
                    rule_type: "snat".to_string(),
                    origin_ip: "10.0.0.0/24".to_string(),
                    translation_ip: "1.2.3.4".to_string(),
                    protocol: "any".to_string(),
                    ..Default::default()
                },
            ],
            nat_type: "vcloud".to_string(),
            router_name: "edge-1".to_string(),
            router_type: "vcloud".to_string(),
            router_ip: "172.16.0.1".to_string(),
            client_name: "acme".to_string(),
            datacenter_name: "dc1".to_string(),
            datacenter_password: "hunter2".to_string(),
            datacenter_region: "eu-west".to_string(),
            datacenter_type: "vcloud".to_string(),
            datacenter_username: "admin@acme".to_string(),
            datacenter_access_token: "tok".to_string(),
            datacenter_access_key: "key".to_string(),
            network_name: "web".to_string(),
            nat_gateway_aws_id: "nat-1".to_string(),
            network_aws_id: "subnet-1".to_string(),
            vcloud_url: "https://vcloud.example.com".to_string(),
            status: "processing".to_string(),
            error_code: "".to_string(),
            error_message: "".to_string(),
        }
    }

    #[test]
    fn test_builder_to_vcloud_renames() {
        let output = builder_to_vcloud(&sample_builder());

        assert_eq!(output.event_type, "vcloud");
        assert_eq!(output.service, "svc-1");
        assert_eq!(output.name, "nat1");
        assert_eq!(output.rules.len(), 2);
        assert_eq!(output.rules[1].rule_type, "snat");
        assert_eq!(output.vcloud_url, "https://vcloud.example.com");

        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["service_id"], "svc-1");
        assert_eq!(value["nat_name"], "nat1");
        assert!(value.get("nat_gateway_aws_id").is_none());
        assert!(value.get("datacenter_token").is_none());
    }

    #[test]
    fn test_vcloud_round_trip_keeps_shared_fields() {
        let input = sample_builder();
        let back = vcloud_to_builder(&builder_to_vcloud(&input));

        assert_eq!(back.uuid, input.uuid);
        assert_eq!(back.batch_id, input.batch_id);
        assert_eq!(back.name, input.name);
        assert_eq!(back.rules, input.rules);
        assert_eq!(back.router_name, input.router_name);
        assert_eq!(back.router_type, input.router_type);
        assert_eq!(back.router_ip, input.router_ip);
        assert_eq!(back.datacenter_username, input.datacenter_username);
        assert_eq!(back.datacenter_password, input.datacenter_password);
        // `_type` was the router type on the way out
        assert_eq!(back.event_type, "vcloud");
    }

    #[test]
    fn test_vcloud_to_builder_leaves_aws_fields_empty() {
        let back = vcloud_to_builder(&builder_to_vcloud(&sample_builder()));

        assert_eq!(back.nat_type, "");
        assert_eq!(back.nat_gateway_aws_id, "");
        assert_eq!(back.network_aws_id, "");
        assert_eq!(back.datacenter_access_token, "");
        assert_eq!(back.datacenter_access_key, "");
    }
}
