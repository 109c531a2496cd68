//! Deterministic JSON serialization
//!
//! Equal bodies must serialize to identical bytes so the transport can key
//! its request cache on them.

use crate::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Serialize with object keys sorted and nulls dropped from arrays.
pub fn to_canonical_string<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value)?;
    Ok(serde_json::to_string(&canonicalize(value))?)
}

/// Rebuild `value` with sorted keys at every level and no null array items.
pub fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, canonicalize(v)))
                .collect();
            // Map may be insertion-ordered (`preserve_order`)
            let mut out = Map::with_capacity(sorted.len());
            out.extend(sorted);
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|item| !item.is_null())
                .map(canonicalize)
                .collect(),
        ),
        other => other,
    }
}
