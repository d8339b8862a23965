//! Definition merge engine.
//!
//! Definitions, OpenAPI-derived fields and user overrides all meet here as
//! plain [`serde_json::Value`] trees. The merge is overlay-wins:
//!
//! | base      | overlay   | result                     |
//! |-----------|-----------|----------------------------|
//! | object    | object    | key union, shared keys recurse |
//! | anything  | non-object| overlay                    |
//! | non-object| object    | overlay                    |
//!
//! Arrays are never merged element-wise, and an explicit `null` in the
//! overlay replaces the base value. Only a key that is *absent* from the
//! overlay leaves the base untouched.

use serde_json::Value;

/// Merge `overlay` onto `base`, returning the merged tree.
pub fn merge(mut base: Value, overlay: Value) -> Value {
    merge_into(&mut base, overlay);
    base
}

/// In-place variant of [`merge`].
///
/// Existing keys keep their position in `base`; keys only in `overlay` are
/// appended in overlay order.
fn merge_into(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge_into(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, overlay) => *slot = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "name": "petstore",
            "status": "CREATED",
            "tags": ["a", "b"],
            "endpointConfig": { "type": "http", "timeout": 30 },
            "extra": null
        })
    }

    #[test]
    fn empty_overlay_is_identity() {
        assert_eq!(merge(sample(), json!({})), sample());
    }

    #[test]
    fn empty_base_takes_overlay() {
        assert_eq!(merge(json!({}), sample()), sample());
    }

    #[test]
    fn overlay_wins_on_scalar_conflict() {
        let merged = merge(sample(), json!({ "status": "PUBLISHED" }));
        assert_eq!(merged["status"], "PUBLISHED");
        assert_eq!(merged["name"], "petstore");
        assert_eq!(merged["tags"], json!(["a", "b"]));
    }

    #[test]
    fn arrays_are_replaced_not_concatenated() {
        let merged = merge(sample(), json!({ "tags": ["c"] }));
        assert_eq!(merged["tags"], json!(["c"]));
    }

    #[test]
    fn nested_objects_recurse() {
        let merged = merge(sample(), json!({ "endpointConfig": { "timeout": 60, "retries": 2 } }));
        assert_eq!(
            merged["endpointConfig"],
            json!({ "type": "http", "timeout": 60, "retries": 2 })
        );
    }

    #[test]
    fn type_mismatch_resolved_by_overlay() {
        let merged = merge(sample(), json!({ "endpointConfig": "none", "name": { "x": 1 } }));
        assert_eq!(merged["endpointConfig"], "none");
        assert_eq!(merged["name"], json!({ "x": 1 }));
    }

    #[test]
    fn explicit_null_wins_but_absent_key_does_not() {
        let merged = merge(sample(), json!({ "endpointConfig": null }));
        assert_eq!(merged["endpointConfig"], Value::Null);
        assert_eq!(merged["status"], "CREATED");
    }

    #[test]
    fn new_keys_are_added_and_untouched_keys_preserved() {
        let merged = merge(sample(), json!({ "visibility": "PUBLIC" }));
        assert_eq!(merged["visibility"], "PUBLIC");
        for key in ["name", "status", "tags", "endpointConfig", "extra"] {
            assert_eq!(merged[key], sample()[key], "key {key} changed");
        }
    }

    #[test]
    fn merge_is_idempotent_for_same_overlay() {
        let overlay = json!({ "status": "PUBLISHED", "endpointConfig": { "timeout": 5 } });
        let once = merge(sample(), overlay.clone());
        let twice = merge(once.clone(), overlay);
        assert_eq!(once, twice);
    }

    #[test]
    fn non_object_base_is_replaced() {
        assert_eq!(merge(json!([1, 2]), json!({ "a": 1 })), json!({ "a": 1 }));
        assert_eq!(merge(json!("x"), json!(3)), json!(3));
    }

    #[test]
    fn last_applied_overlay_wins() {
        let merged = merge(
            merge(sample(), json!({ "status": "PROTOTYPED" })),
            json!({ "status": "PUBLISHED" }),
        );
        assert_eq!(merged["status"], "PUBLISHED");
    }

    #[test]
    fn existing_key_order_is_kept() {
        let merged = merge(sample(), json!({ "zzz": 1, "name": "other" }));
        let keys: Vec<_> = merged.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["name", "status", "tags", "endpointConfig", "extra", "zzz"]);
    }
}
