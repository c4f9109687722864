use serde::{Deserialize, Serialize};
use std::fmt;

/// How a hook script is launched.
///
/// Matching is case-insensitive. Unknown values are preserved so the runner
/// can report them instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScriptType {
    Node,
    Shell,
    Other(String),
}

impl From<String> for ScriptType {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "node" => ScriptType::Node,
            "shell" => ScriptType::Shell,
            _ => ScriptType::Other(s),
        }
    }
}

impl From<ScriptType> for String {
    fn from(t: ScriptType) -> Self {
        t.to_string()
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptType::Node => f.write_str("node"),
            ScriptType::Shell => f.write_str("shell"),
            ScriptType::Other(s) => f.write_str(s),
        }
    }
}

/// A user-declared hook script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptSpec {
    #[serde(rename = "type")]
    pub kind: ScriptType,

    pub path: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default, deserialize_with = "crate::de::flexible_bool")]
    pub fail_on_error: bool,
}

impl ScriptSpec {
    pub fn new(kind: ScriptType, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            args: Vec::new(),
            fail_on_error: false,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn fail_on_error(mut self, fail: bool) -> Self {
        self.fail_on_error = fail;
        self
    }
}
