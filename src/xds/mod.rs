//! Envoy xDS v3 `RouteConfiguration` construction.
//!
//! One module per traffic direction, plus the shared primitives and
//! per-route filter config they build on.

pub mod egress;
pub mod filters;
pub mod inbound;
pub mod ingress;
pub mod outbound;
pub mod primitives;

pub use envoy_types::pb::envoy::config::route::v3::RouteConfiguration;
