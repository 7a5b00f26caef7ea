//! Egress route-configuration builder (spec.md §4.4).
//!
//! Per port, builds a route configuration for permitted external
//! destinations. Unlike outbound, each rule carries a real HTTP route
//! match (path, methods, headers) rather than a wildcard; unlike inbound,
//! there is no identity gating.

use crate::policy::EgressPolicyMap;
use crate::xds::primitives::{build_routes, virtual_host_name};
use crate::xds::RouteConfiguration;
use envoy_types::pb::envoy::config::route::v3::{Route, VirtualHost};
use envoy_types::pb::google::protobuf::BoolValue;
use tracing::debug;

const DIRECTION: &str = "egress";

/// Build one route configuration per port in `policies` (spec.md §4.4).
pub fn build(policies: &EgressPolicyMap) -> Vec<RouteConfiguration> {
    policies.iter().map(|(port, configs)| build_for_port(*port, configs)).collect()
}

fn build_for_port(port: u16, configs: &[crate::policy::EgressHttpRouteConfig]) -> RouteConfiguration {
    let virtual_hosts: Vec<VirtualHost> = configs
        .iter()
        .map(|config| {
            let name = virtual_host_name(DIRECTION, config.name.as_deref(), &config.hostnames);
            let routes = transform_rules(&config.rules);
            debug!(port, virtual_host = %name, routes = routes.len(), "built egress virtual host");
            VirtualHost { name, domains: config.hostnames.clone(), routes, ..Default::default() }
        })
        .collect();

    RouteConfiguration {
        name: format!("rds-egress.{port}"),
        virtual_hosts,
        validate_clusters: Some(BoolValue { value: false }),
        ..Default::default()
    }
}

fn transform_rules(rules: &[crate::policy::EgressRoutingRule]) -> Vec<Route> {
    rules.iter().flat_map(|rule| build_routes(&rule.route)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{
        EgressHttpRouteConfig, EgressRoutingRule, HttpRouteMatch, PathMatchType, RetryPolicy, RouteSpec,
        WeightedCluster,
    };
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn rule() -> EgressRoutingRule {
        EgressRoutingRule {
            route: RouteSpec {
                route_match: HttpRouteMatch {
                    path: "/".to_string(),
                    path_match_type: PathMatchType::Prefix,
                    methods: vec!["*".to_string()],
                    headers: BTreeMap::new(),
                },
                weighted_clusters: vec![WeightedCluster { cluster_name: "external/pypi|443".to_string(), weight: 100 }],
                retry_policy: RetryPolicy {
                    retry_on: "pear".to_string(),
                    per_try_timeout: Some(Duration::from_secs(1)),
                    num_retries: Some(3),
                },
            },
        }
    }

    #[test]
    fn empty_policy_map_yields_empty_output() {
        assert!(build(&EgressPolicyMap::new()).is_empty());
    }

    #[test]
    fn two_ports_produce_two_route_configs() {
        let mut policies = EgressPolicyMap::new();
        for port in [80u16, 90u16] {
            policies.insert(
                port,
                vec![EgressHttpRouteConfig {
                    name: None,
                    hostnames: vec!["pypi.org".to_string()],
                    rules: vec![rule()],
                }],
            );
        }
        let configs = build(&policies);
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].name, "rds-egress.80");
        assert_eq!(configs[1].name, "rds-egress.90");
        for cfg in &configs {
            assert_eq!(cfg.virtual_hosts[0].name, "egress_virtual-host|pypi.org");
        }
    }

    #[test]
    fn retry_policy_passes_through() {
        let mut policies = EgressPolicyMap::new();
        policies.insert(
            80,
            vec![EgressHttpRouteConfig { name: None, hostnames: vec!["pypi.org".to_string()], rules: vec![rule()] }],
        );
        let configs = build(&policies);
        let route = &configs[0].virtual_hosts[0].routes[0];
        let action = match route.action.as_ref().unwrap() {
            envoy_types::pb::envoy::config::route::v3::route::Action::Route(a) => a,
            _ => panic!("expected route action"),
        };
        let retry = action.retry_policy.as_ref().unwrap();
        assert_eq!(retry.retry_on, "pear");
        assert_eq!(retry.num_retries.as_ref().unwrap().value, 3);
    }
}
