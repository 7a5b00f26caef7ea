//! Typed Envoy protobuf `Any` helpers shared by filter configuration builders.
//!
//! The RDS builder attaches exactly one filter's worth of per-route
//! configuration — RBAC, for inbound identity gating (§4.6) — plus,
//! for stats headers, a plain header-value-option list. Both go through
//! the same `Any`-wrapping helper so the wire encoding stays consistent.

pub mod http;

use envoy_types::pb::google::protobuf::Any;
use prost::Message;

/// Helper for building Envoy `Any` values from prost messages.
///
/// Combines type-URL tagging and protobuf encoding in one step.
pub fn any_from_message<M: Message>(type_url: impl Into<String>, msg: &M) -> Any {
    Any { type_url: type_url.into(), value: msg.encode_to_vec() }
}

/// Error helper for invalid filter configuration.
pub fn invalid_config(msg: impl Into<String>) -> crate::Error {
    crate::Error::config(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[derive(Clone, PartialEq, Eq, Message)]
    struct TestMessage {
        #[prost(string, tag = "1")]
        field: String,
    }

    #[test]
    fn any_from_message_round_trip() {
        let msg = TestMessage { field: "hello".into() };
        let any = any_from_message("type.googleapis.com/test.Message", &msg);
        assert_eq!(any.type_url, "type.googleapis.com/test.Message");
        assert!(!any.value.is_empty());
    }
}
