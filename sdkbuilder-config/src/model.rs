//! Typed configuration model.
//!
//! Every section and optional leaf defaults, so a document only needs the
//! fields validation requires (`settings.sdkRepo` and the two swagger paths).

use indexmap::IndexMap;
use sdkbuilder_types::ScriptSpec;
use sdkbuilder_types::de::{flexible_bool, non_empty_string};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level primary configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SdkConfig {
    /// Repository, schema, generator and logging settings.
    pub settings: Settings,

    /// Hooks and switches for each pipeline stage.
    pub stage_settings: StageSettings,

    /// Flat name -> value variables seeded into the environment, in document order.
    pub env_vars: Map<String, Value>,
}

/// `settings` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Repository the SDK is cloned from and released to.
    pub sdk_repo: Option<RepoRef>,

    /// Old/new schema locations.
    pub swagger: SwaggerSettings,

    /// External generator options.
    pub swagger_codegen: CodegenSettings,

    /// JSON file holding the persisted `VersionRecord`.
    #[serde(deserialize_with = "non_empty_string")]
    pub version_file: Option<String>,

    /// Release note template; defaults under the common root when unset.
    #[serde(deserialize_with = "non_empty_string")]
    pub release_note_template_path: Option<String>,

    /// Where per-language extension sources are copied after generation.
    #[serde(deserialize_with = "non_empty_string")]
    pub extensions_destination: Option<String>,

    /// `silly`, `verbose`, `debug`, `info`, `warn` or `error`.
    #[serde(deserialize_with = "non_empty_string")]
    pub log_level: Option<String>,

    /// Log the resolved documents at debug level.
    #[serde(deserialize_with = "flexible_bool")]
    pub debug_config: bool,
}

/// Repository reference: a bare URL, or `{repo, branch}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RepoRef {
    Url(String),
    Detailed {
        repo: String,
        #[serde(default, deserialize_with = "non_empty_string")]
        branch: Option<String>,
    },
}

impl RepoRef {
    pub fn repo(&self) -> &str {
        match self {
            RepoRef::Url(url) => url,
            RepoRef::Detailed { repo, .. } => repo,
        }
    }

    pub fn branch(&self) -> Option<&str> {
        match self {
            RepoRef::Url(_) => None,
            RepoRef::Detailed { branch, .. } => branch.as_deref(),
        }
    }
}

/// `settings.swagger` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwaggerSettings {
    /// Previously published schema (file path or http(s) URL).
    pub old_swagger_path: String,

    /// Schema to generate from (file path or http(s) URL).
    pub new_swagger_path: String,

    /// Optional copy destination for the old schema.
    #[serde(deserialize_with = "non_empty_string")]
    pub save_old_swagger_path: Option<String>,

    /// Optional copy destination for the new schema.
    #[serde(deserialize_with = "non_empty_string")]
    pub save_new_swagger_path: Option<String>,
}

/// `settings.swaggerCodegen` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodegenSettings {
    /// Target language; also selects `resources/sdk/<language>`.
    pub language: String,

    /// Generator jar.
    #[serde(deserialize_with = "non_empty_string")]
    pub jar_path: Option<String>,

    /// Generator config file passed with `-c`.
    #[serde(deserialize_with = "non_empty_string")]
    pub config_file: Option<String>,

    /// Appended verbatim to the generator command line.
    pub extra_generator_options: Vec<String>,
}

/// Hooks shared by every stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StageHooks {
    pub pre_run_scripts: Vec<ScriptSpec>,
    pub post_run_scripts: Vec<ScriptSpec>,
}

/// `stageSettings` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StageSettings {
    pub prebuild: StageHooks,
    pub build: BuildStage,
    pub postbuild: PostbuildStage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildStage {
    #[serde(flatten)]
    pub hooks: StageHooks,

    /// Run after generation; always fatal on failure.
    pub compile_scripts: Vec<ScriptSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostbuildStage {
    #[serde(flatten)]
    pub hooks: StageHooks,

    #[serde(deserialize_with = "flexible_bool")]
    pub publish_release: bool,
}

/// Overlay ("local") document: grouped environment variables only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayConfig {
    pub env_vars: IndexMap<String, EnvGroup>,
}

/// One named group of overlay variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvGroup {
    #[serde(default, deserialize_with = "flexible_bool")]
    pub group_disabled: bool,

    #[serde(flatten)]
    pub vars: Map<String, Value>,
}
