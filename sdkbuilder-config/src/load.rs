//! Reading configuration documents from disk.

use crate::error::ConfigError;
use camino::Utf8Path;
use fs_err as fs;
use serde_json::Value;
use tracing::info;

/// Document syntax, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// `.yml`/`.yaml` (any case) are YAML; everything else is read as JSON.
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("yml") | Some("yaml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Load a configuration document. A missing file is `ConfigMissing`.
pub fn load_document(path: &Utf8Path) -> Result<Value, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::ConfigMissing {
            path: path.to_path_buf(),
        });
    }

    let format = DocumentFormat::from_path(path);
    match format {
        DocumentFormat::Yaml => info!("loading YAML config from {}", path),
        DocumentFormat::Json => info!("loading JSON config from {}", path),
    }

    let contents = fs::read_to_string(path)?;
    parse_document(&contents, format, path.as_str())
}

/// Load an optional document; absence yields an empty object.
pub fn load_optional_document(path: Option<&Utf8Path>) -> Result<Value, ConfigError> {
    match path {
        Some(path) => match load_document(path) {
            Err(ConfigError::ConfigMissing { path }) => {
                tracing::warn!("no local config provided. Path: {}", path);
                Ok(empty_document())
            }
            other => other,
        },
        None => Ok(empty_document()),
    }
}

/// Parse a document. An empty document reads as `{}`.
pub fn parse_document(
    contents: &str,
    format: DocumentFormat,
    origin: &str,
) -> Result<Value, ConfigError> {
    let parsed = match format {
        DocumentFormat::Yaml => serde_yaml::from_str::<Value>(contents).map_err(|e| e.to_string()),
        DocumentFormat::Json if contents.trim().is_empty() => Ok(Value::Null),
        DocumentFormat::Json => serde_json::from_str::<Value>(contents).map_err(|e| e.to_string()),
    }
    .map_err(|message| ConfigError::ConfigParse {
        path: origin.to_string(),
        message,
    })?;

    match parsed {
        Value::Null => Ok(empty_document()),
        Value::Object(_) => Ok(parsed),
        other => Err(ConfigError::ConfigParse {
            path: origin.to_string(),
            message: format!("expected a mapping at the top level, found {}", kind(&other)),
        }),
    }
}

pub(crate) fn empty_document() -> Value {
    Value::Object(serde_json::Map::new())
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            DocumentFormat::from_path(Utf8Path::new("a/config.YAML")),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::from_path(Utf8Path::new("config.yml")),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::from_path(Utf8Path::new("config.json")),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(Utf8Path::new("config")),
            DocumentFormat::Json
        );
    }

    #[test]
    fn yaml_and_json_parse_to_same_value() {
        let yaml = "settings:\n  sdkRepo: org/repo\n";
        let json = r#"{"settings":{"sdkRepo":"org/repo"}}"#;
        let a = parse_document(yaml, DocumentFormat::Yaml, "a.yml").unwrap();
        let b = parse_document(json, DocumentFormat::Json, "b.json").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_documents_are_empty_objects() {
        assert_eq!(
            parse_document("", DocumentFormat::Yaml, "x.yml").unwrap(),
            json!({})
        );
        assert_eq!(
            parse_document("  \n", DocumentFormat::Json, "x.json").unwrap(),
            json!({})
        );
    }

    #[test]
    fn non_mapping_root_is_rejected() {
        let err = parse_document("[1, 2]", DocumentFormat::Json, "x.json").unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParse { .. }));
        assert!(err.to_string().contains("a sequence"));
    }

    #[test]
    fn missing_optional_document_is_empty() {
        let doc =
            load_optional_document(Some(Utf8Path::new("/definitely/not/here.yml"))).unwrap();
        assert_eq!(doc, json!({}));
    }

    #[test]
    fn missing_primary_document_is_config_missing() {
        let err = load_document(Utf8Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigMissing { .. }));
    }
}
