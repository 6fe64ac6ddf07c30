//! Configuration layer merge
//!
//! Layers are merged with:
//! - Objects: deep-merge by key
//! - Arrays: REPLACE (last wins), so `variants` and `rule_files` come
//!   from a single layer
//! - Scalars: override (last wins)

use serde_json::Value;

/// Deep merge two JSON values.
///
/// Merge semantics:
/// - Objects: deep-merge by key (recursive)
/// - Arrays: REPLACE (second wins entirely)
/// - Scalars: override (second wins)
/// - Null: override (null can override any value)
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }

        (_, overlay) => overlay,
    }
}

/// Merge layers in order (first is base, last has highest precedence)
pub fn merge_layers(layers: Vec<Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}

/// Build a nested object from a dotted key, e.g. `toolchain.min_platform`.
///
/// Arrays, objects and booleans are parsed as JSON (`["a"]`, `true`). Every
/// other value stays the raw string, so `26.10` and `1234` keep their text;
/// numeric fields parse it when the typed config is extracted.
pub fn dotted_override(key: &str, raw: &str) -> Value {
    let leaf = parse_leaf(raw);
    key.rsplit('.').fold(leaf, |acc, part| {
        let mut map = serde_json::Map::new();
        map.insert(part.to_string(), acc);
        Value::Object(map)
    })
}

fn parse_leaf(raw: &str) -> Value {
    let trimmed = raw.trim();
    let structured = trimmed.starts_with('[')
        || trimmed.starts_with('{')
        || trimmed == "true"
        || trimmed == "false";
    if structured {
        if let Ok(value) = serde_json::from_str(trimmed) {
            return value;
        }
    }
    Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_override() {
        let base = json!({"toolchain": {"min_platform": 21}});
        let overlay = json!({"toolchain": {"min_platform": 24}});
        let result = deep_merge(base, overlay);
        assert_eq!(result["toolchain"]["min_platform"], 24);
    }

    #[test]
    fn test_object_deep_merge() {
        let base = json!({
            "toolchain": {
                "ndk_version": "27.0.12077973",
                "target_platform": "latest"
            }
        });
        let overlay = json!({
            "toolchain": {
                "target_platform": 34
            }
        });
        let result = deep_merge(base, overlay);

        assert_eq!(result["toolchain"]["target_platform"], 34);
        assert_eq!(result["toolchain"]["ndk_version"], "27.0.12077973");
    }

    #[test]
    fn test_rule_files_replace() {
        let base = json!({"optimization": {"rule_files": ["a.pro", "b.pro", "c.pro"]}});
        let overlay = json!({"optimization": {"rule_files": ["x.pro"]}});
        let result = deep_merge(base, overlay);

        let files = result["optimization"]["rule_files"].as_array().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0], "x.pro");
    }

    #[test]
    fn test_variants_replace() {
        let host = json!({"variants": [{"name": "debug"}, {"name": "release"}]});
        let repo = json!({"variants": [{"name": "profile"}]});
        let result = merge_layers(vec![host, repo]);

        assert_eq!(result["variants"].as_array().unwrap().len(), 1);
        assert_eq!(result["variants"][0]["name"], "profile");
    }

    #[test]
    fn test_merge_layers_precedence() {
        let builtin = json!({"toolchain": {"min_platform": 21, "ndk_version": "27.0.12077973"}});
        let host = json!({"toolchain": {"min_platform": 23}});
        let repo = json!({"toolchain": {"ndk_version": "26.1.10909125"}});
        let cli = json!({"toolchain": {"min_platform": 26}});

        let result = merge_layers(vec![builtin, host, repo, cli]);

        assert_eq!(result["toolchain"]["min_platform"], 26);
        assert_eq!(result["toolchain"]["ndk_version"], "26.1.10909125");
    }

    #[test]
    fn test_dotted_override() {
        assert_eq!(
            dotted_override("toolchain.min_platform", "24"),
            json!({"toolchain": {"min_platform": "24"}})
        );
        assert_eq!(
            dotted_override("optimization.shrink_code", "true"),
            json!({"optimization": {"shrink_code": true}})
        );
        assert_eq!(
            dotted_override("toolchain.ndk_version", "27.0.12077973"),
            json!({"toolchain": {"ndk_version": "27.0.12077973"}})
        );
        assert_eq!(
            dotted_override("toolchain.target_platform", "latest"),
            json!({"toolchain": {"target_platform": "latest"}})
        );
        assert_eq!(
            dotted_override("optimization.rule_files", r#"["a.pro", "b.pro"]"#),
            json!({"optimization": {"rule_files": ["a.pro", "b.pro"]}})
        );
    }

    #[test]
    fn test_dotted_override_keeps_number_like_text() {
        assert_eq!(
            dotted_override("toolchain.ndk_version", "26.10"),
            json!({"toolchain": {"ndk_version": "26.10"}})
        );
        assert_eq!(
            dotted_override("toolchain.ndk_version", "27.0"),
            json!({"toolchain": {"ndk_version": "27.0"}})
        );
        assert_eq!(
            dotted_override("signing.alias", "1234"),
            json!({"signing": {"alias": "1234"}})
        );
        assert_eq!(
            dotted_override("signing.credential_ref", "null"),
            json!({"signing": {"credential_ref": "null"}})
        );
    }

    #[test]
    fn test_dotted_override_malformed_array_stays_text() {
        assert_eq!(
            dotted_override("signing.alias", "[upload"),
            json!({"signing": {"alias": "[upload"}})
        );
    }
}
