//! # rds-builder
//!
//! RDS (Route Discovery Service) route-configuration builder for a
//! service-mesh control plane: translates inbound, outbound, ingress, and
//! egress mesh traffic policy into Envoy xDS v3 `RouteConfiguration`
//! messages.
//!
//! ## Architecture
//!
//! ```text
//! policy compiler (external) → rds::policy inputs → direction builders → RouteConfiguration
//!                                                         ↓
//!                                              rds::xds::primitives (shared)
//! ```
//!
//! The four builders (`xds::inbound`, `xds::outbound`, `xds::ingress`,
//! `xds::egress`) are the only public entry points a caller (the xDS
//! server, out of scope here) needs; everything else is shared machinery.

pub mod config;
pub mod errors;
pub mod policy;
pub mod xds;

pub use errors::{Error, RdsError, Result};

/// Crate version, from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name, from Cargo.toml.
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_looks_like_semver() {
        let components: Vec<_> = VERSION.split('.').collect();
        assert!(components.len() >= 3, "version should follow semver: {VERSION}");
        assert!(components.iter().all(|part| !part.is_empty()));
        assert_eq!(APP_NAME, "rds-builder");
    }
}
