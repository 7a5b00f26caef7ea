//! Mesh traffic policy data model.
//!
//! Pure value types describing the inputs the four route builders consume
//! (`xds::inbound`, `xds::outbound`, `xds::ingress`, `xds::egress`). These
//! carry no infrastructure dependencies and are treated as immutable,
//! caller-owned snapshots by every builder.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// A mesh service identity, e.g. `"bookbuyer.default"`.
///
/// The sentinel wildcard identity (`"*"`) matches any caller.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServiceIdentity(String);

impl ServiceIdentity {
    const WILDCARD: &'static str = "*";

    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn wildcard() -> Self {
        Self(Self::WILDCARD.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.0 == Self::WILDCARD
    }
}

impl std::fmt::Display for ServiceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The set of identities permitted to invoke a rule. Empty ⇒ deny by default
/// (spec invariant 1: such a rule contributes no route).
pub type AllowedIdentities = BTreeSet<ServiceIdentity>;

/// Path matching taxonomy for an HTTP route match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMatchType {
    Exact,
    Prefix,
    Regex,
}

/// A weighted upstream cluster target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedCluster {
    pub cluster_name: String,
    pub weight: u32,
}

/// Retry behavior, passed through verbatim to the emitted route.
///
/// An empty instance (`retry_on` empty, no timeout, no retry count) is
/// valid and simply yields a retry policy with no effective retries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retry_on: String,
    pub per_try_timeout: Option<Duration>,
    pub num_retries: Option<u32>,
}

/// A single HTTP route match: path, verbs, and header constraints.
#[derive(Debug, Clone)]
pub struct HttpRouteMatch {
    pub path: String,
    pub path_match_type: PathMatchType,
    /// May contain duplicates and/or the wildcard verb `"*"`; sanitized by
    /// `xds::primitives::sanitize_methods` before route construction.
    pub methods: Vec<String>,
    /// Header name → regex string. The key `"host"` is translated to the
    /// wire header `":authority"` by the route builder.
    pub headers: BTreeMap<String, String>,
}

/// One routable unit: a match plus its traffic target and retry behavior.
#[derive(Debug, Clone)]
pub struct RouteSpec {
    pub route_match: HttpRouteMatch,
    pub weighted_clusters: Vec<WeightedCluster>,
    pub retry_policy: RetryPolicy,
}

/// An inbound rule: a route plus the identities allowed to invoke it.
#[derive(Debug, Clone)]
pub struct InboundRule {
    pub route: RouteSpec,
    pub allowed_identities: AllowedIdentities,
}

/// A named group of inbound rules sharing a set of hostnames.
#[derive(Debug, Clone)]
pub struct InboundTrafficPolicy {
    pub name: Option<String>,
    pub hostnames: Vec<String>,
    pub rules: Vec<InboundRule>,
}

/// Port → ordered inbound traffic policies.
pub type InboundPolicyMap = BTreeMap<u16, Vec<InboundTrafficPolicy>>;

/// A single outbound weighted-cluster route.
///
/// Outbound match criteria are always a wildcard (spec.md §4.2: L4
/// selection already happened upstream), so unlike `RouteSpec` there is no
/// `HttpRouteMatch` here — only the traffic-splitting target and retry
/// behavior the shared route builder needs.
#[derive(Debug, Clone)]
pub struct OutboundRoute {
    pub weighted_clusters: Vec<WeightedCluster>,
    pub retry_policy: RetryPolicy,
}

/// A named group of outbound routes sharing a set of hostnames.
#[derive(Debug, Clone)]
pub struct OutboundTrafficPolicy {
    pub name: Option<String>,
    pub hostnames: Vec<String>,
    pub routes: Vec<OutboundRoute>,
}

/// Port → ordered outbound traffic policies.
pub type OutboundPolicyMap = BTreeMap<u16, Vec<OutboundTrafficPolicy>>;

/// Ingress policies are structurally identical to inbound ones (hostnames
/// plus rules with per-rule weighted clusters and retry policy) but carry
/// no identity gating; the type alias makes that sharing explicit while
/// keeping the two call sites (inbound vs. ingress builders) distinct.
pub type IngressTrafficPolicy = InboundTrafficPolicy;

/// A single egress routing rule: a route with no identity gating.
#[derive(Debug, Clone)]
pub struct EgressRoutingRule {
    pub route: RouteSpec,
}

/// A named group of egress routing rules sharing a set of hostnames.
#[derive(Debug, Clone)]
pub struct EgressHttpRouteConfig {
    pub name: Option<String>,
    pub hostnames: Vec<String>,
    pub rules: Vec<EgressRoutingRule>,
}

/// Port → ordered egress HTTP route configs.
pub type EgressPolicyMap = BTreeMap<u16, Vec<EgressHttpRouteConfig>>;

/// Feature-flag snapshot governing optional behavior.
///
/// Unknown flags (e.g. loaded from an environment with extra keys) are
/// ignored; only `enable_wasm_stats` is recognized.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FeatureFlags {
    #[serde(default)]
    pub enable_wasm_stats: bool,
}

/// A capability for deriving stats response headers for a proxy.
///
/// Modeled as a trait (rather than a concrete struct) so the inbound
/// builder stays independent of how a descriptor derives its headers.
pub trait ProxyDescriptor {
    /// Ordered `(name, value)` pairs to attach as `responseHeadersToAdd`.
    fn stats_headers(&self) -> Vec<(String, String)>;
}

fn _assert_send_sync() {
    fn assert<T: Send + Sync>() {}
    assert::<ServiceIdentity>();
    assert::<InboundTrafficPolicy>();
    assert::<OutboundTrafficPolicy>();
    assert::<EgressHttpRouteConfig>();
    assert::<FeatureFlags>();
}
