use crate::ports::SchemaDiff;
use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use sdkbuilder_types::{VersionBump, VersionRecord};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use tracing::{debug, info, warn};

const DEFAULT_TEMPLATE: &str = "{{changes}}";

/// Differences between two specifications, by path/operation and definition name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<String>,
}

impl ChangeSummary {
    /// Removals are breaking, additions are features, anything else is a fix.
    pub fn bump(&self) -> VersionBump {
        if !self.removed.is_empty() {
            VersionBump::Major
        } else if !self.added.is_empty() {
            VersionBump::Minor
        } else {
            VersionBump::Point
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    /// Markdown list of the changes, grouped by kind.
    pub fn render_markdown(&self) -> String {
        if self.is_empty() {
            return "No API changes.\n".to_string();
        }
        let mut out = String::new();
        for (heading, items) in [
            ("Breaking Changes", &self.removed),
            ("New Features", &self.added),
            ("Changes", &self.modified),
        ] {
            if items.is_empty() {
                continue;
            }
            let _ = writeln!(out, "### {heading}\n");
            for item in items {
                let _ = writeln!(out, "- {item}");
            }
            out.push('\n');
        }
        out
    }
}

/// Compare two specifications.
pub fn diff_specs(old: &Value, new: &Value) -> ChangeSummary {
    let mut summary = ChangeSummary::default();
    compare_section(
        &operations(old),
        &operations(new),
        "operation",
        &mut summary,
    );
    compare_section(
        &section(old, "definitions"),
        &section(new, "definitions"),
        "definition",
        &mut summary,
    );
    summary
}

fn section(spec: &Value, key: &str) -> Map<String, Value> {
    spec.get(key)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// `"GET /users"`-style keys for every operation under `paths`.
fn operations(spec: &Value) -> Map<String, Value> {
    let mut ops = Map::new();
    for (path, item) in section(spec, "paths") {
        match item.as_object() {
            Some(methods) => {
                for (method, op) in methods {
                    ops.insert(format!("{} {}", method.to_ascii_uppercase(), path), op.clone());
                }
            }
            None => {
                ops.insert(path, item);
            }
        }
    }
    ops
}

fn compare_section(
    old: &Map<String, Value>,
    new: &Map<String, Value>,
    kind: &str,
    summary: &mut ChangeSummary,
) {
    let old_keys: BTreeSet<&String> = old.keys().collect();
    let new_keys: BTreeSet<&String> = new.keys().collect();

    for key in old_keys.difference(&new_keys) {
        summary.removed.push(format!("Removed {kind} {key}"));
    }
    for key in new_keys.difference(&old_keys) {
        summary.added.push(format!("Added {kind} {key}"));
    }
    for key in old_keys.intersection(&new_keys) {
        if old.get(key.as_str()) != new.get(key.as_str()) {
            summary.modified.push(format!("Modified {kind} {key}"));
        }
    }
}

/// Loads specifications from files or http(s) URLs and diffs them.
#[derive(Debug, Default)]
pub struct FsSchemaDiff {
    new: Option<Value>,
    changes: ChangeSummary,
}

impl FsSchemaDiff {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Read a JSON document from a path or an `http(s)://` URL.
pub fn load_spec(location: &str) -> anyhow::Result<Value> {
    if location.starts_with("http://") || location.starts_with("https://") {
        debug!(url = %location, "downloading specification");
        let response = reqwest::blocking::get(location)
            .with_context(|| format!("download {}", location))?;
        if !response.status().is_success() {
            anyhow::bail!("download of {} failed with HTTP {}", location, response.status());
        }
        return response
            .json()
            .with_context(|| format!("parse specification from {}", location));
    }

    let text = fs::read_to_string(location).with_context(|| format!("read {}", location))?;
    serde_json::from_str(&text).with_context(|| format!("parse specification {}", location))
}

fn save_copy(path: &Utf8Path, spec: &Value) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create parent dir for {}", path))?;
    }
    let json = serde_json::to_string_pretty(spec).context("serialize specification")?;
    fs::write(path, json).with_context(|| format!("write {}", path))
}

impl SchemaDiff for FsSchemaDiff {
    fn get_and_diff(
        &mut self,
        old: &str,
        new: &str,
        save_old: Option<&Utf8Path>,
        save_new: Option<&Utf8Path>,
    ) -> anyhow::Result<()> {
        info!("Diffing swagger files...");
        let old_spec = load_spec(old).context("load old specification")?;
        let new_spec = load_spec(new).context("load new specification")?;

        if let Some(path) = save_old {
            save_copy(path, &old_spec)?;
        }
        if let Some(path) = save_new {
            save_copy(path, &new_spec)?;
        }

        self.changes = diff_specs(&old_spec, &new_spec);
        info!(
            added = self.changes.added.len(),
            removed = self.changes.removed.len(),
            modified = self.changes.modified.len(),
            "specification diff complete"
        );
        self.new = Some(new_spec);
        Ok(())
    }

    fn increment_version(&self, version: &mut VersionRecord) {
        version.bump(self.changes.bump());
    }

    fn stringify_version(&self, version: &VersionRecord) -> String {
        version.render()
    }

    fn generate_release_notes(
        &self,
        template: &Utf8Path,
        version: &VersionRecord,
    ) -> anyhow::Result<String> {
        let template_text = if template.exists() {
            fs::read_to_string(template).with_context(|| format!("read {}", template))?
        } else {
            warn!("Release note template not found: {}", template);
            DEFAULT_TEMPLATE.to_string()
        };
        Ok(template_text
            .replace("{{version}}", &version.display())
            .replace("{{changes}}", &self.changes.render_markdown()))
    }

    fn new_swagger(&self) -> Option<&Value> {
        self.new.as_ref()
    }

    fn new_swagger_mut(&mut self) -> Option<&mut Value> {
        self.new.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn spec(paths: Value, definitions: Value) -> Value {
        json!({"swagger": "2.0", "paths": paths, "definitions": definitions})
    }

    #[test]
    fn removed_operation_is_major() {
        let old = spec(json!({"/users": {"get": {}, "delete": {}}}), json!({}));
        let new = spec(json!({"/users": {"get": {}}}), json!({}));
        let changes = diff_specs(&old, &new);
        assert_eq!(changes.removed, vec!["Removed operation DELETE /users"]);
        assert_eq!(changes.bump(), VersionBump::Major);
    }

    #[test]
    fn added_definition_is_minor() {
        let old = spec(json!({}), json!({"User": {}}));
        let new = spec(json!({}), json!({"User": {}, "Group": {}}));
        let changes = diff_specs(&old, &new);
        assert_eq!(changes.added, vec!["Added definition Group"]);
        assert_eq!(changes.bump(), VersionBump::Minor);
    }

    #[test]
    fn modification_only_is_point() {
        let old = spec(json!({}), json!({"User": {"type": "object"}}));
        let new = spec(json!({}), json!({"User": {"type": "string"}}));
        let changes = diff_specs(&old, &new);
        assert_eq!(changes.modified, vec!["Modified definition User"]);
        assert_eq!(changes.bump(), VersionBump::Point);
    }

    #[test]
    fn loads_files_saves_copies_and_renders_notes() {
        let temp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        std::fs::write(root.join("old.json"), r#"{"definitions":{"A":{}}}"#).unwrap();
        std::fs::write(root.join("new.json"), r#"{"definitions":{"A":{},"B":{}}}"#).unwrap();
        std::fs::write(root.join("notes.md"), "v{{version}}\n{{changes}}").unwrap();

        let mut diff = FsSchemaDiff::new();
        diff.get_and_diff(
            root.join("old.json").as_str(),
            root.join("new.json").as_str(),
            None,
            Some(&root.join("saved/new.json")),
        )
        .unwrap();
        assert!(root.join("saved/new.json").exists());
        assert!(diff.new_swagger().unwrap()["definitions"].get("B").is_some());

        let mut version = VersionRecord {
            major: 1,
            prerelease: String::new(),
            ..VersionRecord::default()
        };
        diff.increment_version(&mut version);
        assert_eq!(version.display(), "1.1.0");

        let notes = diff
            .generate_release_notes(&root.join("notes.md"), &version)
            .unwrap();
        assert!(notes.starts_with("v1.1.0\n### New Features"));
        assert!(notes.contains("- Added definition B"));
    }

    #[test]
    fn missing_template_falls_back_to_change_list() {
        let diff = FsSchemaDiff::new();
        let notes = diff
            .generate_release_notes(Utf8Path::new("/no/template.md"), &VersionRecord::default())
            .unwrap();
        assert_eq!(notes, "No API changes.\n");
    }

    #[test]
    fn unreadable_spec_is_an_error() {
        let mut diff = FsSchemaDiff::new();
        let err = diff
            .get_and_diff("/no/old.json", "/no/new.json", None, None)
            .unwrap_err();
        assert!(format!("{err:#}").contains("load old specification"));
    }
}
