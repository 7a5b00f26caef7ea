//! Per-route RBAC (Role-Based Access Control) filter configuration.
//!
//! Implements SPEC_FULL.md §4.6: a rule's allowed service identities become
//! an Envoy RBAC policy that the downstream `envoy.filters.http.rbac` filter
//! enforces using only the per-route config and the caller's presented
//! identity (spec.md §6).
//!
//! Unlike a general-purpose, user-authored RBAC filter config, the shape
//! produced here is fixed: one policy, one permission (`any: true`, since
//! the HTTP route match has already scoped what this policy covers), and
//! one principal per allowed identity.

use crate::policy::{AllowedIdentities, ServiceIdentity};
use crate::xds::filters::any_from_message;
use envoy_types::pb::envoy::config::rbac::v3::{
    permission, principal, Permission, Policy, Principal, Rbac as RbacRulesProto,
};
use envoy_types::pb::envoy::extensions::filters::http::rbac::v3::{
    Rbac as RbacProto, RbacPerRoute as RbacPerRouteProto,
};
use envoy_types::pb::envoy::r#type::matcher::v3::{string_matcher::MatchPattern, StringMatcher};
use envoy_types::pb::google::protobuf::Any as EnvoyAny;
use std::collections::HashMap;

/// Type URL for the per-route RBAC filter configuration.
pub const RBAC_PER_ROUTE_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.filters.http.rbac.v3.RBACPerRoute";

/// HTTP filter name this config is keyed under in a route's
/// `typed_per_filter_config` map.
pub const RBAC_FILTER_NAME: &str = "envoy.filters.http.rbac";

const ALLOW_ACTION: i32 = 0;
const POLICY_NAME: &str = "allowed-identities";

/// Build the per-route RBAC filter config enforcing `allowed` as the set of
/// identities permitted to invoke the route.
///
/// `allowed` must not be empty; callers apply invariant 1 of spec.md §3
/// (empty/null allowed-identities ⇒ no route at all) before calling this.
pub fn build_per_route_auth_config(allowed: &AllowedIdentities) -> EnvoyAny {
    let principals = if allowed.contains(&ServiceIdentity::wildcard()) {
        vec![Principal { identifier: Some(principal::Identifier::Any(true)) }]
    } else {
        allowed.iter().map(identity_to_principal).collect()
    };

    let policy = Policy {
        permissions: vec![Permission { rule: Some(permission::Rule::Any(true)) }],
        principals,
        condition: None,
        checked_condition: None,
        cel_config: None,
    };

    let rules = RbacRulesProto {
        action: ALLOW_ACTION,
        policies: HashMap::from([(POLICY_NAME.to_string(), policy)]),
        audit_logging_options: None,
    };

    let proto = RbacPerRouteProto {
        rbac: Some(RbacProto {
            rules: Some(rules),
            rules_stat_prefix: String::new(),
            shadow_rules: None,
            shadow_rules_stat_prefix: String::new(),
            track_per_rule_stats: false,
            matcher: None,
            shadow_matcher: None,
        }),
    };

    any_from_message(RBAC_PER_ROUTE_TYPE_URL, &proto)
}

fn identity_to_principal(identity: &ServiceIdentity) -> Principal {
    Principal {
        identifier: Some(principal::Identifier::Authenticated(principal::Authenticated {
            principal_name: Some(StringMatcher {
                match_pattern: Some(MatchPattern::Exact(identity.as_str().to_string())),
                ignore_case: false,
            }),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;
    use std::collections::BTreeSet;

    fn policy_of(proto: &RbacPerRouteProto) -> &Policy {
        proto.rbac.as_ref().unwrap().rules.as_ref().unwrap().policies.get(POLICY_NAME).unwrap()
    }

    #[test]
    fn single_identity_becomes_authenticated_principal() {
        let mut allowed = BTreeSet::new();
        allowed.insert(ServiceIdentity::new("bookbuyer.default"));
        let any = build_per_route_auth_config(&allowed);
        assert_eq!(any.type_url, RBAC_PER_ROUTE_TYPE_URL);

        let decoded = RbacPerRouteProto::decode(any.value.as_slice()).expect("valid bytes");
        let policy = policy_of(&decoded);
        assert_eq!(policy.principals.len(), 1);
        assert!(matches!(
            policy.principals[0].identifier,
            Some(principal::Identifier::Authenticated(_))
        ));
    }

    #[test]
    fn wildcard_identity_collapses_to_any_principal() {
        let mut allowed = BTreeSet::new();
        allowed.insert(ServiceIdentity::wildcard());
        allowed.insert(ServiceIdentity::new("bookbuyer.default"));
        let any = build_per_route_auth_config(&allowed);

        let decoded = RbacPerRouteProto::decode(any.value.as_slice()).expect("valid bytes");
        let policy = policy_of(&decoded);
        assert_eq!(policy.principals.len(), 1);
        assert!(matches!(policy.principals[0].identifier, Some(principal::Identifier::Any(true))));
    }

    #[test]
    fn action_is_always_allow() {
        let mut allowed = BTreeSet::new();
        allowed.insert(ServiceIdentity::new("bookbuyer.default"));
        let any = build_per_route_auth_config(&allowed);
        let decoded = RbacPerRouteProto::decode(any.value.as_slice()).expect("valid bytes");
        assert_eq!(decoded.rbac.as_ref().unwrap().rules.as_ref().unwrap().action, ALLOW_ACTION);
    }
}
