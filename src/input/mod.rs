//! Input adapters: two incompatible source schemas, one `StyleRecord` out.
//!
//! The flat list (script mode) and the nested BeerJSON document (populate
//! mode) share no field names; each adapter owns its own deserialization
//! shape and hands back the common record.

pub mod beerjson;
pub mod flat;

use serde_json::Value;

/// Text coercion shared by the adapters: non-empty strings survive,
/// everything else is treated as absent.
pub(crate) fn text(raw: Option<&Value>) -> Option<String> {
    match raw? {
        Value::String(s) => {
            let s = s.as_str();
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        }
        _ => None,
    }
}
