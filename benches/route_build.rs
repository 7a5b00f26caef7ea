use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rds_builder::policy::{
    AllowedIdentities, FeatureFlags, HttpRouteMatch, InboundPolicyMap, InboundRule, InboundTrafficPolicy,
    PathMatchType, RetryPolicy, RouteSpec, ServiceIdentity, WeightedCluster,
};
use rds_builder::xds::inbound;
use std::collections::BTreeMap;

fn rule(index: usize) -> InboundRule {
    let mut allowed = AllowedIdentities::new();
    allowed.insert(ServiceIdentity::new(format!("caller-{index}.default")));

    InboundRule {
        route: RouteSpec {
            route_match: HttpRouteMatch {
                path: format!("/resource-{index}"),
                path_match_type: PathMatchType::Prefix,
                methods: vec!["GET".to_string(), "POST".to_string()],
                headers: BTreeMap::new(),
            },
            weighted_clusters: vec![
                WeightedCluster { cluster_name: format!("cluster-{index}-a"), weight: 70 },
                WeightedCluster { cluster_name: format!("cluster-{index}-b"), weight: 30 },
            ],
            retry_policy: RetryPolicy { retry_on: "5xx".to_string(), per_try_timeout: None, num_retries: Some(2) },
        },
        allowed_identities: allowed,
    }
}

fn policy_map(rules_per_port: usize) -> InboundPolicyMap {
    let mut policies = InboundPolicyMap::new();
    for port in [80u16, 443u16, 8080u16] {
        policies.insert(
            port,
            vec![InboundTrafficPolicy {
                name: Some(format!("service-{port}")),
                hostnames: vec![format!("service-{port}.default.svc.cluster.local")],
                rules: (0..rules_per_port).map(rule).collect(),
            }],
        );
    }
    policies
}

fn bench_inbound_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("inbound_build");
    let flags = FeatureFlags::default();

    for size in [10usize, 100, 500] {
        let policies = policy_map(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &policies, |b, policies| {
            b.iter(|| black_box(inbound::build(policies, None, &flags)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_inbound_build);
criterion_main!(benches);
