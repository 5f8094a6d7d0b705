//! Parameter key-convention translation.
//!
//! Tool arguments arrive in camelCase on the wire; the operations script
//! expects snake_case. Known keys go through an explicit table, everything
//! else through a generic conversion, recursively across nested objects
//! and arrays.

use serde_json::Value;

/// Known wire-key translations (camelCase -> snake_case)
const KEY_MAPPINGS: &[(&str, &str)] = &[
    ("projectPath", "project_path"),
    ("scenePath", "scene_path"),
    ("rootNodeType", "root_node_type"),
    ("parentNodePath", "parent_node_path"),
    ("nodeType", "node_type"),
    ("nodeName", "node_name"),
    ("texturePath", "texture_path"),
    ("nodePath", "node_path"),
    ("outputPath", "output_path"),
    ("meshItemNames", "mesh_item_names"),
    ("newPath", "new_path"),
    ("filePath", "file_path"),
];

/// Convert one camelCase key to snake_case
pub fn snake_case_key(key: &str) -> String {
    if let Some((_, snake)) = KEY_MAPPINGS.iter().find(|(camel, _)| *camel == key) {
        return (*snake).to_string();
    }

    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Recursively rewrite all object keys from camelCase to snake_case
pub fn to_snake_case_params(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let converted = map
                .iter()
                .map(|(k, v)| (snake_case_key(k), to_snake_case_params(v)))
                .collect();
            Value::Object(converted)
        }
        Value::Array(items) => Value::Array(items.iter().map(to_snake_case_params).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mapped_keys() {
        assert_eq!(snake_case_key("projectPath"), "project_path");
        assert_eq!(snake_case_key("meshItemNames"), "mesh_item_names");
    }

    #[test]
    fn test_generic_fallback() {
        assert_eq!(snake_case_key("someUnknownKey"), "some_unknown_key");
        assert_eq!(snake_case_key("already_snake"), "already_snake");
        assert_eq!(snake_case_key("scene"), "scene");
    }

    #[test]
    fn test_nested_conversion() {
        let input = json!({
            "scenePath": "scenes/main.tscn",
            "properties": {
                "zIndex": 2,
                "customData": { "spawnPoint": [1, 2] }
            },
            "meshItemNames": ["Wall", "Floor"]
        });

        let converted = to_snake_case_params(&input);
        assert_eq!(converted["scene_path"], "scenes/main.tscn");
        assert_eq!(converted["properties"]["z_index"], 2);
        assert_eq!(converted["properties"]["custom_data"]["spawn_point"][0], 1);
        assert_eq!(converted["mesh_item_names"][1], "Floor");
    }

    #[test]
    fn test_scalars_untouched() {
        assert_eq!(to_snake_case_params(&json!(42)), json!(42));
        assert_eq!(to_snake_case_params(&json!("aB")), json!("aB"));
    }
}
