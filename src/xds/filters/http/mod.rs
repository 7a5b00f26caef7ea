//! HTTP filter configuration builders used by the RDS route builder.
//!
//! This crate's HTTP connection manager filter chain is assumed to be
//! configured by its caller (the listener/LDS side, out of scope here);
//! the only filter-shaped thing the RDS builder itself produces is the
//! per-route RBAC override described in SPEC_FULL.md §4.6.

pub mod rbac;
