//! Outbound route-configuration builder (spec.md §4.2).
//!
//! Outbound traffic already had its destination selected upstream (at the
//! listener/cluster level), so every route match here is a wildcard: path
//! regex `.*`, method regex `.*`, no user headers.

use crate::policy::OutboundPolicyMap;
use crate::xds::primitives::{build_weighted_cluster_block, retry_policy_proto, virtual_host_name, wildcard_route_match};
use crate::xds::RouteConfiguration;
use envoy_types::pb::envoy::config::route::v3::route::Action;
use envoy_types::pb::envoy::config::route::v3::route_action::ClusterSpecifier;
use envoy_types::pb::envoy::config::route::v3::{Route, RouteAction, VirtualHost};
use envoy_types::pb::google::protobuf::{BoolValue, Duration};
use tracing::{debug, warn};

const DIRECTION: &str = "outbound";

/// Build one route configuration per port in `policies` (spec.md §4.2).
pub fn build(policies: &OutboundPolicyMap) -> Vec<RouteConfiguration> {
    policies.iter().map(|(port, traffic_policies)| build_for_port(*port, traffic_policies)).collect()
}

fn build_for_port(port: u16, traffic_policies: &[crate::policy::OutboundTrafficPolicy]) -> RouteConfiguration {
    let virtual_hosts: Vec<VirtualHost> = traffic_policies
        .iter()
        .map(|policy| {
            let name = virtual_host_name(DIRECTION, policy.name.as_deref(), &policy.hostnames);
            let routes: Vec<Route> = policy
                .routes
                .iter()
                .filter_map(|route| {
                    let Some(weighted_cluster) = build_weighted_cluster_block(&route.weighted_clusters) else {
                        warn!(virtual_host = %name, "skipping outbound route with zero total weight");
                        return None;
                    };
                    Some(Route {
                        r#match: Some(wildcard_route_match()),
                        action: Some(Action::Route(RouteAction {
                            cluster_specifier: Some(ClusterSpecifier::WeightedClusters(weighted_cluster)),
                            timeout: Some(Duration { seconds: 0, nanos: 0 }),
                            retry_policy: Some(retry_policy_proto(&route.retry_policy)),
                            ..Default::default()
                        })),
                        ..Default::default()
                    })
                })
                .collect();
            debug!(port, virtual_host = %name, routes = routes.len(), "built outbound virtual host");
            VirtualHost { name, domains: policy.hostnames.clone(), routes, ..Default::default() }
        })
        .collect();

    RouteConfiguration {
        name: format!("rds-outbound.{port}"),
        virtual_hosts,
        validate_clusters: Some(BoolValue { value: false }),
        ..Default::default()
    }
}
