//! Inline expansion of document-local `$ref` pointers.
//!
//! `{"$ref": "#/shared/scripts/0"}` is replaced by a copy of the value at that
//! JSON pointer so later stages never dereference anything. References to
//! other documents are left as-is.

use crate::error::ConfigError;
use serde_json::Value;
use tracing::debug;

/// Expand every local `$ref` in `doc`. Targets are read from the document as
/// it was before expansion started.
pub fn expand_refs(doc: &mut Value) -> Result<(), ConfigError> {
    let root = doc.clone();
    let mut active = Vec::new();
    expand_node(doc, &root, &mut active)
}

fn expand_node(node: &mut Value, root: &Value, active: &mut Vec<String>) -> Result<(), ConfigError> {
    let local_ref = match node.get("$ref") {
        Some(Value::String(pointer)) if pointer.starts_with('#') => Some(pointer.clone()),
        Some(Value::String(pointer)) => {
            debug!(reference = %pointer, "leaving external $ref unexpanded");
            None
        }
        _ => None,
    };

    if let Some(pointer) = local_ref {
        if active.contains(&pointer) {
            return Err(ConfigError::invalid(format!(
                "circular $ref: {} -> {}",
                active.join(" -> "),
                pointer
            )));
        }
        let mut target = lookup(root, &pointer)
            .ok_or_else(|| ConfigError::invalid(format!("unresolved $ref: {}", pointer)))?
            .clone();

        active.push(pointer);
        expand_node(&mut target, root, active)?;
        active.pop();

        *node = target;
        return Ok(());
    }

    match node {
        Value::Object(map) => {
            for value in map.values_mut() {
                expand_node(value, root, active)?;
            }
        }
        Value::Array(items) => {
            for value in items.iter_mut() {
                expand_node(value, root, active)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Resolve `#/a/b` (or `#` for the whole document) against `root`.
fn lookup<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    let fragment = reference.strip_prefix('#')?;
    if fragment.is_empty() {
        return Some(root);
    }
    if !fragment.starts_with('/') {
        return None;
    }
    root.pointer(fragment)
}
