//! Payload sanitizer: the one place where the shape of AI output is guessed.
//!
//! Models are asked for a bare JSON array but regularly answer with
//! `{"questions": [...]}` or some other wrapper. Everything downstream only
//! ever sees a flat `Vec<Value>`.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Shapes a raw payload can take, tried in declaration order.
#[derive(Deserialize)]
#[serde(untagged)]
enum PayloadShape {
  Sequence(Vec<Value>),
  Keyed(Map<String, Value>),
  Other(serde::de::IgnoredAny),
}

/// Turn any payload into an ordered item sequence (possibly empty).
///
/// - array: returned as-is
/// - object: the first value (document key order) that is an array
/// - anything else, including null: empty
pub fn sanitize_payload(payload: Value) -> Vec<Value> {
  let shape = serde_json::from_value::<PayloadShape>(payload)
    .unwrap_or(PayloadShape::Other(serde::de::IgnoredAny));

  match shape {
    PayloadShape::Sequence(items) => items,
    PayloadShape::Keyed(map) => {
      let found = map.into_iter().find_map(|(key, value)| match value {
        Value::Array(items) => Some((key, items)),
        _ => None,
      });
      match found {
        Some((key, items)) => {
          debug!(target: "games", %key, len = items.len(), "Unwrapped item array from object payload");
          items
        }
        None => Vec::new(),
      }
    }
    PayloadShape::Other(_) => Vec::new(),
  }
}
