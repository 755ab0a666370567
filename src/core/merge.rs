//! Configuration overlay merge
//!
//! Merge semantics:
//! - Mappings: deep-merge by key
//! - Sequences: REPLACE (overlay wins entirely)
//! - Scalars: override (overlay wins)

use serde_yaml::Value;

/// Deep merge two YAML values.
///
/// The base is consumed, never aliased, so merging a caller overlay over the
/// default template can never mutate the template itself.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        // Both mappings: deep merge
        (Value::Mapping(mut base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = if let Some(base_value) = base_map.remove(&key) {
                    deep_merge(base_value, overlay_value)
                } else {
                    overlay_value
                };
                base_map.insert(key, merged);
            }
            Value::Mapping(base_map)
        }

        // Sequences: REPLACE (no concatenation)
        (Value::Sequence(_), overlay @ Value::Sequence(_)) => overlay,

        // Scalars and any other case: overlay wins
        (_, overlay) => overlay,
    }
}

/// Merge multiple overlay layers in order (first is base, last has highest precedence)
pub fn merge_layers(layers: Vec<Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}
