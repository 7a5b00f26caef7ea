//! Ingress route-configuration builder (spec.md §4.3).
//!
//! Structurally mirrors `xds::inbound`, but for non-mesh callers: no
//! identity gating (so no per-route RBAC filter config) and no stats
//! headers. All ingress policies collapse into a single route
//! configuration rather than one per port.

use crate::policy::{IngressTrafficPolicy, InboundRule};
use crate::xds::primitives::{build_routes, virtual_host_name};
use crate::xds::RouteConfiguration;
use envoy_types::pb::envoy::config::route::v3::{Route, VirtualHost};
use envoy_types::pb::google::protobuf::BoolValue;
use tracing::debug;

const DIRECTION: &str = "ingress";
const CONFIG_NAME: &str = "rds-ingress";

/// Build the single ingress route configuration from a flat policy
/// sequence (spec.md §4.3). Returns an empty `Vec` if `policies` is empty.
pub fn build(policies: &[IngressTrafficPolicy]) -> Vec<RouteConfiguration> {
    if policies.is_empty() {
        return Vec::new();
    }

    let virtual_hosts: Vec<VirtualHost> = policies
        .iter()
        .map(|policy| {
            let name = virtual_host_name(DIRECTION, policy.name.as_deref(), &policy.hostnames);
            let routes = transform_rules(&policy.rules);
            debug!(virtual_host = %name, routes = routes.len(), "built ingress virtual host");
            VirtualHost { name, domains: policy.hostnames.clone(), routes, ..Default::default() }
        })
        .collect();

    vec![RouteConfiguration {
        name: CONFIG_NAME.to_string(),
        virtual_hosts,
        validate_clusters: Some(BoolValue { value: false }),
        ..Default::default()
    }]
}

fn transform_rules(rules: &[InboundRule]) -> Vec<Route> {
    rules.iter().flat_map(|rule| build_routes(&rule.route)).collect()
}
