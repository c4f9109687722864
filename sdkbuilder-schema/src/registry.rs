//! Transient identifier -> (derived name, schema) registry.

use crate::error::{RefResolutionFailure, SchemaError};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::trace;

pub const DEFINITIONS_PREFIX: &str = "#/definitions/";
pub const NOTIFICATION_SUFFIX: &str = "Notification";

/// One extracted definition.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionEntry {
    pub identifier: String,
    pub derived_name: String,
    pub schema: Value,
}

/// Segment after the last `:` of a schema identifier.
pub fn last_segment(id: &str) -> &str {
    id.rsplit(':').next().unwrap_or(id)
}

/// Name of a definition with identifier `id` found under `root_name`.
///
/// The root schema itself keeps `root_name`; nested definitions get their
/// last id segment appended.
pub fn derive_name(root_name: &str, id: &str) -> String {
    let last = last_segment(id);
    let own_root = format!("{last}{NOTIFICATION_SUFFIX}");
    if root_name == own_root {
        root_name.to_string()
    } else {
        format!("{root_name}{last}")
    }
}

/// Definitions keyed by full identifier, in first-registration order.
#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    entries: IndexMap<String, DefinitionEntry>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every object under `node` (including `node`) that carries a
    /// string `id`. Re-registering an identifier replaces the earlier entry.
    pub fn extract_definitions(&mut self, root_name: &str, node: &Value) {
        match node {
            Value::Object(map) => {
                if let Some(Value::String(id)) = map.get("id") {
                    let derived_name = derive_name(root_name, id);
                    trace!(id = %id, name = %derived_name, "registered definition");
                    self.entries.insert(
                        id.clone(),
                        DefinitionEntry {
                            identifier: id.clone(),
                            derived_name,
                            schema: node.clone(),
                        },
                    );
                }
                for value in map.values() {
                    self.extract_definitions(root_name, value);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.extract_definitions(root_name, item);
                }
            }
            _ => {}
        }
    }

    pub fn get(&self, id: &str) -> Option<&DefinitionEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DefinitionEntry> {
        self.entries.values()
    }

    pub fn into_entries(self) -> impl Iterator<Item = DefinitionEntry> {
        self.entries.into_values()
    }

    /// Rewrite every `$ref` under `node` that does not start with `#` to
    /// `#/definitions/<derived name>`. Misses are collected, never skipped
    /// silently; resolvable references are still rewritten.
    pub fn fix_refs(&self, node: &mut Value, definition: &str) -> Result<(), SchemaError> {
        let mut failures = Vec::new();
        let mut path = String::new();
        self.fix_node(node, definition, &mut path, &mut failures);
        if failures.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::RefResolution(failures))
        }
    }

    /// Fix the references of every registered schema in place.
    pub fn fix_all_refs(&mut self) -> Result<(), SchemaError> {
        let mut failures = Vec::new();
        for index in 0..self.entries.len() {
            let Some((_, entry)) = self.entries.get_index_mut(index) else {
                continue;
            };
            let mut schema = std::mem::take(&mut entry.schema);
            let name = entry.derived_name.clone();

            let mut path = String::new();
            self.fix_node(&mut schema, &name, &mut path, &mut failures);

            if let Some((_, entry)) = self.entries.get_index_mut(index) {
                entry.schema = schema;
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::RefResolution(failures))
        }
    }

    fn fix_node(
        &self,
        node: &mut Value,
        definition: &str,
        path: &mut String,
        failures: &mut Vec<RefResolutionFailure>,
    ) {
        match node {
            Value::Object(map) => {
                for (key, value) in map.iter_mut() {
                    let len = path.len();
                    path.push('/');
                    path.push_str(&escape_pointer(key));
                    if key == "$ref" {
                        if let Value::String(reference) = value {
                            self.rewrite(reference, definition, path, failures);
                        }
                    } else {
                        self.fix_node(value, definition, path, failures);
                    }
                    path.truncate(len);
                }
            }
            Value::Array(items) => {
                for (i, item) in items.iter_mut().enumerate() {
                    let len = path.len();
                    path.push('/');
                    path.push_str(&i.to_string());
                    self.fix_node(item, definition, path, failures);
                    path.truncate(len);
                }
            }
            _ => {}
        }
    }

    fn rewrite(
        &self,
        reference: &mut String,
        definition: &str,
        path: &str,
        failures: &mut Vec<RefResolutionFailure>,
    ) {
        if reference.starts_with('#') {
            return;
        }
        match self.entries.get(reference.as_str()) {
            Some(entry) => {
                *reference = format!("{DEFINITIONS_PREFIX}{}", entry.derived_name);
            }
            None => failures.push(RefResolutionFailure {
                definition: definition.to_string(),
                reference: reference.clone(),
                path: path.to_string(),
            }),
        }
    }
}

fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn root_schema_keeps_its_name() {
        assert_eq!(
            derive_name("XyzTopicNotification", "urn:abc:def:XyzTopic"),
            "XyzTopicNotification"
        );
        assert_eq!(
            derive_name("XyzTopicNotification", "urn:abc:def:User"),
            "XyzTopicNotificationUser"
        );
        assert_eq!(derive_name("NoColonNotification", "NoColon"), "NoColonNotification");
    }

    #[test]
    fn extraction_walks_arrays_and_nested_objects() {
        let mut registry = DefinitionRegistry::new();
        registry.extract_definitions(
            "TNotification",
            &json!({
                "id": "urn:x:T",
                "properties": {
                    "a": {"id": "urn:x:A", "properties": {"b": {"id": "urn:x:B"}}},
                    "list": {"items": [{"id": "urn:x:C"}]}
                }
            }),
        );
        let names: Vec<_> = registry.iter().map(|e| e.derived_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["TNotification", "TNotificationA", "TNotificationB", "TNotificationC"]
        );
    }

    #[test]
    fn non_string_id_is_not_a_definition() {
        let mut registry = DefinitionRegistry::new();
        registry.extract_definitions("TNotification", &json!({"id": 4, "inner": {"id": null}}));
        assert!(registry.is_empty());
    }

    #[test]
    fn reregistration_replaces() {
        let mut registry = DefinitionRegistry::new();
        registry.extract_definitions("ANotification", &json!({"id": "urn:x:Shared", "v": 1}));
        registry.extract_definitions("BNotification", &json!({"id": "urn:x:Shared", "v": 2}));
        assert_eq!(registry.len(), 1);
        let entry = registry.get("urn:x:Shared").unwrap();
        assert_eq!(entry.derived_name, "BNotificationShared");
        assert_eq!(entry.schema["v"], json!(2));
    }

    #[test]
    fn fix_refs_skips_local_pointers_and_collects_misses() {
        let mut registry = DefinitionRegistry::new();
        registry.extract_definitions("TNotification", &json!({"id": "urn:x:T"}));

        let mut node = json!({
            "a": {"$ref": "urn:x:T"},
            "b": {"$ref": "#/definitions/Kept"},
            "c": [{"$ref": "urn:x:Nope"}],
            "d/e": {"$ref": "urn:x:AlsoNope"}
        });
        let err = registry.fix_refs(&mut node, "Holder").unwrap_err();

        assert_eq!(node["a"]["$ref"], json!("#/definitions/TNotification"));
        assert_eq!(node["b"]["$ref"], json!("#/definitions/Kept"));
        match err {
            SchemaError::RefResolution(failures) => {
                let paths: Vec<_> = failures.iter().map(|f| f.path.as_str()).collect();
                assert_eq!(paths, vec!["/c/0/$ref", "/d~1e/$ref"]);
                assert_eq!(failures[0].reference, "urn:x:Nope");
                assert_eq!(failures[0].definition, "Holder");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
