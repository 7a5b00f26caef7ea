//! Inbound route-configuration builder (spec.md §4.1).

use crate::policy::{FeatureFlags, InboundPolicyMap, InboundRule, ProxyDescriptor};
use crate::xds::filters::http::rbac::{build_per_route_auth_config, RBAC_FILTER_NAME};
use crate::xds::primitives::{build_routes, header_value_option, virtual_host_name};
use crate::xds::RouteConfiguration;
use envoy_types::pb::envoy::config::route::v3::VirtualHost;
use tracing::{debug, warn};

const DIRECTION: &str = "inbound";

/// Build one route configuration per port in `policies` (spec.md §4.1).
///
/// An empty `policies` map yields an empty output. Rules with no allowed
/// identities contribute no route (spec.md §3 invariant 1); stats headers
/// are attached only when both `flags.enable_wasm_stats` is set and
/// `descriptor` is present.
pub fn build(
    policies: &InboundPolicyMap,
    descriptor: Option<&dyn ProxyDescriptor>,
    flags: &FeatureFlags,
) -> Vec<RouteConfiguration> {
    policies
        .iter()
        .map(|(port, traffic_policies)| build_for_port(*port, traffic_policies, descriptor, flags))
        .collect()
}

fn build_for_port(
    port: u16,
    traffic_policies: &[crate::policy::InboundTrafficPolicy],
    descriptor: Option<&dyn ProxyDescriptor>,
    flags: &FeatureFlags,
) -> RouteConfiguration {
    let virtual_hosts: Vec<VirtualHost> = traffic_policies
        .iter()
        .map(|policy| {
            let name = virtual_host_name(DIRECTION, policy.name.as_deref(), &policy.hostnames);
            let routes = transform_rules(&policy.rules);
            debug!(port, virtual_host = %name, routes = routes.len(), "built inbound virtual host");
            VirtualHost { name, domains: policy.hostnames.clone(), routes, ..Default::default() }
        })
        .collect();

    let response_headers_to_add = if flags.enable_wasm_stats {
        descriptor
            .map(|d| d.stats_headers().iter().map(|(k, v)| header_value_option(k, v)).collect())
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    RouteConfiguration {
        name: format!("rds-inbound.{port}"),
        virtual_hosts,
        validate_clusters: Some(envoy_types::pb::google::protobuf::BoolValue { value: false }),
        response_headers_to_add,
        ..Default::default()
    }
}

fn transform_rules(rules: &[InboundRule]) -> Vec<envoy_types::pb::envoy::config::route::v3::Route> {
    rules
        .iter()
        .flat_map(|rule| {
            if rule.allowed_identities.is_empty() {
                warn!("skipping inbound rule with no allowed identities");
                return Vec::new();
            }

            let auth_config = build_per_route_auth_config(&rule.allowed_identities);
            build_routes(&rule.route)
                .into_iter()
                .map(|mut route| {
                    route
                        .typed_per_filter_config
                        .insert(RBAC_FILTER_NAME.to_string(), auth_config.clone());
                    route
                })
                .collect()
        })
        .collect()
}
