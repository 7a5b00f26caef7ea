//! Shared route-construction primitives (spec.md §4.5).
//!
//! Every direction builder funnels through `build_route` and
//! `build_weighted_cluster_block`; the method sanitizer and cluster
//! ordering live here too since both are required for deterministic
//! emission (spec.md §3 invariants 4 and 5).

use crate::policy::{HttpRouteMatch, PathMatchType, RetryPolicy as PolicyRetryPolicy, RouteSpec, WeightedCluster};
use envoy_types::pb::envoy::config::core::v3::HeaderValueOption;
use envoy_types::pb::envoy::config::route::v3::header_matcher::HeaderMatchSpecifier;
use envoy_types::pb::envoy::config::route::v3::route::Action;
use envoy_types::pb::envoy::config::route::v3::route_action::ClusterSpecifier;
use envoy_types::pb::envoy::config::route::v3::route_match::PathSpecifier;
use envoy_types::pb::envoy::config::route::v3::weighted_cluster::ClusterWeight;
use envoy_types::pb::envoy::config::route::v3::{
    HeaderMatcher, Route, RouteAction, RouteMatch, RetryPolicy as EnvoyRetryPolicy, WeightedCluster as EnvoyWeightedCluster,
};
use envoy_types::pb::envoy::r#type::matcher::v3::regex_matcher::EngineType;
use envoy_types::pb::envoy::r#type::matcher::v3::string_matcher::MatchPattern;
use envoy_types::pb::envoy::r#type::matcher::v3::{GoogleRe2, RegexMatcher, StringMatcher};
use envoy_types::pb::google::protobuf::{Duration, UInt32Value};

/// Wire header name for the synthesized method matcher.
pub const METHOD_HEADER: &str = ":method";
/// Wire header name `"host"` is translated to, per spec.md §3 invariant 6.
pub const AUTHORITY_HEADER: &str = ":authority";
/// Wildcard match-all regex used for method and path wildcards.
pub const MATCH_ALL_REGEX: &str = ".*";

/// Build a safe regex matcher with the RE2 engine explicit (spec.md §4.5.5,
/// §6: "safe regex" is a wire-compatibility requirement, not left implicit).
pub fn build_safe_regex(pattern: impl Into<String>) -> RegexMatcher {
    RegexMatcher {
        regex: pattern.into(),
        engine_type: Some(EngineType::GoogleRe2(GoogleRe2::default())),
    }
}

fn safe_regex_string_matcher(pattern: impl Into<String>) -> StringMatcher {
    StringMatcher { match_pattern: Some(MatchPattern::SafeRegex(build_safe_regex(pattern))), ignore_case: false }
}

/// De-duplicate and order a method set (spec.md §4.5.3).
///
/// A set containing the wildcard verb collapses to `["*"]`; otherwise
/// methods are sorted ascending with duplicates removed. Empty input stays
/// empty (callers must not emit a route for an empty result).
pub fn sanitize_methods(methods: &[String]) -> Vec<String> {
    if methods.iter().any(|m| m == "*") {
        return vec!["*".to_string()];
    }
    let mut unique: Vec<String> = methods.to_vec();
    unique.sort();
    unique.dedup();
    unique
}

fn method_header_matcher(method: &str) -> HeaderMatcher {
    let regex = if method == "*" { MATCH_ALL_REGEX } else { method };
    HeaderMatcher {
        name: METHOD_HEADER.to_string(),
        header_match_specifier: Some(HeaderMatchSpecifier::StringMatch(safe_regex_string_matcher(regex))),
        invert_match: false,
        treat_missing_header_as_empty: false,
    }
}

fn user_header_matchers(headers: &std::collections::BTreeMap<String, String>) -> Vec<HeaderMatcher> {
    headers
        .iter()
        .map(|(name, regex)| {
            let wire_name = if name == "host" { AUTHORITY_HEADER.to_string() } else { name.clone() };
            HeaderMatcher {
                name: wire_name,
                header_match_specifier: Some(HeaderMatchSpecifier::StringMatch(safe_regex_string_matcher(
                    regex.clone(),
                ))),
                invert_match: false,
                treat_missing_header_as_empty: false,
            }
        })
        .collect()
}

fn path_specifier(match_type: PathMatchType, path: &str) -> PathSpecifier {
    match match_type {
        PathMatchType::Exact => PathSpecifier::Path(path.to_string()),
        PathMatchType::Prefix => PathSpecifier::Prefix(path.to_string()),
        PathMatchType::Regex => PathSpecifier::SafeRegex(build_safe_regex(path)),
    }
}

fn route_match_for_method(route_match: &HttpRouteMatch, method: &str) -> RouteMatch {
    let mut headers = vec![method_header_matcher(method)];
    headers.extend(user_header_matchers(&route_match.headers));

    RouteMatch {
        path_specifier: Some(path_specifier(route_match.path_match_type, &route_match.path)),
        headers,
        ..Default::default()
    }
}

/// Build the wildcard route match outbound routes use: path regex `.*` and
/// a `":method"` header matcher with regex `.*` (spec.md §4.2), matching
/// what `route_match_for_method` produces for method `"*"` on any other
/// direction.
pub fn wildcard_route_match() -> RouteMatch {
    RouteMatch {
        path_specifier: Some(PathSpecifier::SafeRegex(build_safe_regex(MATCH_ALL_REGEX))),
        headers: vec![method_header_matcher("*")],
        ..Default::default()
    }
}

/// Build the weighted-cluster block for a route action (spec.md §4.5.2).
///
/// Returns `None` when the total weight is zero — callers must omit the
/// route's action (or the whole route) in that case.
pub fn build_weighted_cluster_block(clusters: &[WeightedCluster]) -> Option<EnvoyWeightedCluster> {
    let total: u32 = clusters.iter().map(|c| c.weight).sum();
    if total == 0 {
        return None;
    }

    let mut sorted: Vec<&WeightedCluster> = clusters.iter().collect();
    sorted.sort_by(|a, b| a.cluster_name.cmp(&b.cluster_name));

    let cluster_weights = sorted
        .into_iter()
        .map(|c| ClusterWeight {
            name: c.cluster_name.clone(),
            weight: Some(UInt32Value { value: c.weight }),
            ..Default::default()
        })
        .collect();

    Some(EnvoyWeightedCluster { clusters: cluster_weights, total_weight: Some(UInt32Value { value: total }), ..Default::default() })
}

pub(crate) fn retry_policy_proto(retry: &PolicyRetryPolicy) -> EnvoyRetryPolicy {
    EnvoyRetryPolicy {
        retry_on: retry.retry_on.clone(),
        num_retries: retry.num_retries.map(|value| UInt32Value { value }),
        per_try_timeout: retry.per_try_timeout.map(|d| Duration { seconds: d.as_secs() as i64, nanos: d.subsec_nanos() as i32 }),
        ..Default::default()
    }
}

/// Build one route per sanitized method in `spec.route_match.methods`
/// (spec.md §4.5.1: "one route per method").
///
/// A route whose weighted-cluster total is zero, or whose method set is
/// empty after sanitization, is omitted entirely (spec.md §7).
pub fn build_routes(spec: &RouteSpec) -> Vec<Route> {
    let methods = sanitize_methods(&spec.route_match.methods);
    if methods.is_empty() {
        return Vec::new();
    }

    let Some(weighted_cluster) = build_weighted_cluster_block(&spec.weighted_clusters) else {
        return Vec::new();
    };

    let route_action = RouteAction {
        cluster_specifier: Some(ClusterSpecifier::WeightedClusters(weighted_cluster)),
        timeout: Some(Duration { seconds: 0, nanos: 0 }),
        retry_policy: Some(retry_policy_proto(&spec.retry_policy)),
        ..Default::default()
    };

    methods
        .iter()
        .map(|method| Route {
            r#match: Some(route_match_for_method(&spec.route_match, method)),
            action: Some(Action::Route(route_action.clone())),
            ..Default::default()
        })
        .collect()
}

/// Build a `responseHeadersToAdd` entry (spec.md §4.7), matching the
/// `OVERWRITE_IF_EXISTS_OR_ADD` append action.
pub fn header_value_option(name: &str, value: &str) -> HeaderValueOption {
    const APPEND_ACTION_OVERWRITE_IF_EXISTS_OR_ADD: i32 = 0;
    HeaderValueOption {
        header: Some(envoy_types::pb::envoy::config::core::v3::HeaderValue {
            key: name.to_string(),
            value: value.to_string(),
            raw_value: Vec::new(),
        }),
        append: None,
        append_action: APPEND_ACTION_OVERWRITE_IF_EXISTS_OR_ADD,
        keep_empty_value: false,
    }
}

/// Virtual-host name per spec.md §3 invariant 7.
pub fn virtual_host_name(direction: &str, policy_name: Option<&str>, hostnames: &[String]) -> String {
    let suffix = policy_name.or_else(|| hostnames.first().map(String::as_str)).unwrap_or_default();
    format!("{direction}_virtual-host|{suffix}")
}
