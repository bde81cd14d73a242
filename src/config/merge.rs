//! Configuration schema synchronization
//!
//! Reconciles the versioned default schema against a user's persisted
//! config: user values win for matching keys, missing keys are filled from
//! the defaults, stale keys are dropped with a warning. The top-level
//! `prompts` section bypasses the walk entirely and passes through as-is.

use serde_json::{Map, Value};

use crate::diag::Diagnostics;

/// Top-level keys that bypass schema synchronization entirely.
///
/// The exemption is an explicit allow-list checked at the top level only;
/// a nested key with the same name is an ordinary schema key.
pub const EXEMPT_TOP_LEVEL_KEYS: &[&str] = &["prompts"];

/// Synchronize a user config against the schema defaults.
///
/// Returns the merged config and whether any drift or gap was found. The
/// schema value is never mutated; every level of the result is a fresh map,
/// and re-running on the result yields `changed == false`.
pub fn sync_with_schema(schema: &Value, user: &Value, diag: &dyn Diagnostics) -> (Value, bool) {
    let empty = Map::new();
    let schema_map = schema.as_object().unwrap_or(&empty);
    let user_map = user.as_object().unwrap_or(&empty);

    let mut changed = false;
    let mut merged = sync_level(schema_map, user_map, "", &mut changed, diag);

    // The exempt section survives as-is, whatever its inner shape.
    for key in EXEMPT_TOP_LEVEL_KEYS {
        if let Some(value) = user_map.get(*key) {
            merged.insert((*key).to_string(), value.clone());
        }
    }

    (Value::Object(merged), changed)
}

fn sync_level(
    schema: &Map<String, Value>,
    user: &Map<String, Value>,
    parent: &str,
    changed: &mut bool,
    diag: &dyn Diagnostics,
) -> Map<String, Value> {
    let top_level = parent.is_empty();

    // Stale keys: present in the user config, absent from the schema.
    // They are not copied forward.
    for key in user.keys() {
        if schema.contains_key(key) {
            continue;
        }
        if top_level && EXEMPT_TOP_LEVEL_KEYS.contains(&key.as_str()) {
            continue;
        }
        diag.warn(&format!("dropping stale config key '{parent}{key}'"));
        *changed = true;
    }

    let mut merged = Map::new();
    for (key, schema_value) in schema {
        let full_key = format!("{parent}{key}");
        match user.get(key) {
            Some(user_value) => match (schema_value.as_object(), user_value.as_object()) {
                (Some(schema_child), Some(user_child)) => {
                    let prefix = format!("{full_key}.");
                    let child = sync_level(schema_child, user_child, &prefix, changed, diag);
                    merged.insert(key.clone(), Value::Object(child));
                }
                _ => {
                    // Key exists on both sides: the user's value wins verbatim.
                    merged.insert(key.clone(), user_value.clone());
                }
            },
            None => {
                diag.info(&format!("filling missing config key '{full_key}' = {schema_value}"));
                *changed = true;
                merged.insert(key.clone(), schema_value.clone());
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::{CaptureSink, Level};
    use serde_json::json;

    fn schema() -> Value {
        json!({
            "plugin": {
                "enabled": true,
                "debug_mode": false,
            }
        })
    }

    #[test]
    fn test_empty_user_yields_defaults() {
        let diag = CaptureSink::new();
        let (merged, changed) = sync_with_schema(&schema(), &json!({}), &diag);

        assert!(changed);
        assert_eq!(merged, schema());
    }

    #[test]
    fn test_matching_user_is_unchanged_and_idempotent() {
        let diag = CaptureSink::new();
        let user = schema();
        let (merged, changed) = sync_with_schema(&schema(), &user, &diag);

        assert!(!changed);
        assert_eq!(merged, user);

        let (again, changed_again) = sync_with_schema(&schema(), &merged, &diag);
        assert!(!changed_again);
        assert_eq!(again, merged);
    }

    #[test]
    fn test_user_value_wins() {
        let diag = CaptureSink::new();
        let user = json!({"plugin": {"enabled": false, "debug_mode": true}});
        let (merged, changed) = sync_with_schema(&schema(), &user, &diag);

        assert!(!changed);
        assert_eq!(merged["plugin"]["enabled"], false);
        assert_eq!(merged["plugin"]["debug_mode"], true);
    }

    #[test]
    fn test_nested_gap_filled() {
        let diag = CaptureSink::new();
        let user = json!({"plugin": {"enabled": false}});
        let (merged, changed) = sync_with_schema(&schema(), &user, &diag);

        assert!(changed);
        assert_eq!(merged["plugin"]["enabled"], false);
        assert_eq!(merged["plugin"]["debug_mode"], false);
        assert!(diag.contains(Level::Info, "plugin.debug_mode"));
    }

    #[test]
    fn test_stale_key_dropped_with_warning() {
        let diag = CaptureSink::new();
        let user = json!({
            "plugin": {"enabled": true, "debug_mode": false},
            "foo": "bar",
        });
        let (merged, changed) = sync_with_schema(&schema(), &user, &diag);

        assert!(changed);
        assert!(merged.get("foo").is_none());
        assert!(diag.contains(Level::Warn, "'foo'"));
    }

    #[test]
    fn test_nested_stale_key_dropped_with_path() {
        let diag = CaptureSink::new();
        let user = json!({"plugin": {"enabled": true, "debug_mode": false, "legacy": 1}});
        let (merged, changed) = sync_with_schema(&schema(), &user, &diag);

        assert!(changed);
        assert!(merged["plugin"].get("legacy").is_none());
        assert!(diag.contains(Level::Warn, "'plugin.legacy'"));
    }

    #[test]
    fn test_prompts_preserved_verbatim() {
        let diag = CaptureSink::new();
        let prompts = json!([
            {"name": "a", "content": "hello", "priority": 50},
            {"free_form": {"anything": [1, 2, 3]}},
            "even a bare string",
        ]);
        let user = json!({
            "plugin": {"enabled": true, "debug_mode": false},
            "prompts": prompts,
        });

        let (merged, changed) = sync_with_schema(&schema(), &user, &diag);

        assert!(!changed);
        assert_eq!(merged["prompts"], prompts);
        assert!(!diag.contains(Level::Warn, "prompts"));
    }

    #[test]
    fn test_prompts_preserved_even_when_not_a_sequence() {
        // The merger never validates the exempt section's shape; the load
        // pass deals with it later.
        let diag = CaptureSink::new();
        let user = json!({"prompts": "not a sequence"});
        let (merged, changed) = sync_with_schema(&schema(), &user, &diag);

        assert!(changed); // plugin section was filled in
        assert_eq!(merged["prompts"], "not a sequence");
    }

    #[test]
    fn test_nested_prompts_key_is_not_exempt() {
        let diag = CaptureSink::new();
        let user = json!({"plugin": {"enabled": true, "debug_mode": false, "prompts": [1]}});
        let (merged, changed) = sync_with_schema(&schema(), &user, &diag);

        assert!(changed);
        assert!(merged["plugin"].get("prompts").is_none());
        assert!(diag.contains(Level::Warn, "'plugin.prompts'"));
    }

    #[test]
    fn test_user_scalar_replacing_table_wins() {
        // Matching key with mismatched shapes: the user value still wins.
        let diag = CaptureSink::new();
        let user = json!({"plugin": "off"});
        let (merged, changed) = sync_with_schema(&schema(), &user, &diag);

        assert!(!changed);
        assert_eq!(merged["plugin"], "off");
    }

    #[test]
    fn test_schema_not_mutated() {
        let diag = CaptureSink::new();
        let schema_value = schema();
        let user = json!({"plugin": {"enabled": false}});

        let _ = sync_with_schema(&schema_value, &user, &diag);
        assert_eq!(schema_value, schema());
    }

    #[test]
    fn test_result_has_no_key_absent_from_both() {
        let diag = CaptureSink::new();
        let (merged, _) = sync_with_schema(&schema(), &json!({"extra": 1}), &diag);

        let keys: Vec<&String> = merged.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["plugin"]);
    }
}
