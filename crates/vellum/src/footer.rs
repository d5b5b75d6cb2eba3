//! Footer helpers.
//!
//! Footers are authenticated but not encrypted. When a footer is a JSON
//! object, its `"kid"` member names the key the token was made with. Reading
//! it happens before verification, so the value is only ever used to pick a
//! key, never trusted on its own.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

pub use vellum_core::extract_footer;

/// JSON footer member carrying the key identifier.
pub const KEY_ID_CLAIM: &str = "kid";

/// Read the key identifier from a JSON object footer.
///
/// Returns `None` for empty footers, non-JSON footers, and objects without a
/// string `"kid"` member.
pub fn key_id_from_footer(footer: &[u8]) -> Option<String> {
    if footer.is_empty() {
        return None;
    }
    match serde_json::from_slice::<Value>(footer).ok()? {
        Value::Object(map) => map.get(KEY_ID_CLAIM)?.as_str().map(str::to_string),
        _ => None,
    }
}

/// Write `key_id` into a footer.
///
/// An empty footer becomes `{"kid": key_id}`; a JSON object footer gains (or
/// replaces) its `"kid"` member. Any other footer cannot carry a key id.
pub fn with_key_id(footer: &[u8], key_id: &str) -> Result<Vec<u8>> {
    let mut map = if footer.is_empty() {
        Map::new()
    } else {
        match serde_json::from_slice::<Value>(footer) {
            Ok(Value::Object(map)) => map,
            _ => {
                return Err(Error::Footer(
                    "a key id can only be added to an empty or JSON object footer".into(),
                ))
            }
        }
    };
    map.insert(KEY_ID_CLAIM.to_string(), Value::String(key_id.to_string()));
    serde_json::to_vec(&Value::Object(map)).map_err(|e| Error::Footer(e.to_string()))
}
