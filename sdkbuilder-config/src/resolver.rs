//! Layered resolution: load, deref, default, seed the environment, substitute,
//! then deserialize and validate.

use crate::deref::expand_refs;
use crate::error::ConfigError;
use crate::load::{kind, load_document, load_optional_document};
use crate::model::{OverlayConfig, RepoRef, SdkConfig};
use crate::placeholders::{resolve_placeholders, substitute_with};
use camino::{Utf8Path, Utf8PathBuf};
use sdkbuilder_types::{Environment, EnvironmentBuilder, SetOutcome, vars};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

pub const DEFAULT_PURECLOUD_ENVIRONMENT: &str = "mypurecloud.com";
pub const NEW_SWAGGER_TEMP_FILE: &str = "newSwagger.json";

/// Builds a [`ResolvedConfig`] relative to a common root directory.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    common_root: Utf8PathBuf,
    process_env: Environment,
}

impl ConfigResolver {
    /// Resolver rooted at `common_root`, starting from the current process environment.
    pub fn new(common_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            common_root: common_root.into(),
            process_env: Environment::from_process(),
        }
    }

    /// Replace the base environment the snapshot is built on.
    pub fn with_process_env(mut self, env: Environment) -> Self {
        self.process_env = env;
        self
    }

    pub fn common_root(&self) -> &Utf8Path {
        &self.common_root
    }

    /// Load `primary` (required) and `overlay` (optional) and resolve them.
    pub fn resolve(
        &self,
        primary: &Utf8Path,
        overlay: Option<&Utf8Path>,
    ) -> Result<ResolvedConfig, ConfigError> {
        let primary_doc = load_document(primary)?;
        let overlay_doc = load_optional_document(overlay)?;
        self.resolve_documents(primary_doc, overlay_doc)
    }

    /// Resolve already-parsed documents.
    pub fn resolve_documents(
        &self,
        mut primary: Value,
        mut overlay: Value,
    ) -> Result<ResolvedConfig, ConfigError> {
        expand_refs(&mut primary)?;
        expand_refs(&mut overlay)?;
        apply_defaults(&mut primary)?;

        let language = raw_language(&primary);
        let bootstrap = BootstrapPaths::compute(&self.common_root, &language);
        debug!(
            common_root = %bootstrap.common_root,
            sdk_repo = %bootstrap.sdk_repo,
            sdk_temp = %bootstrap.sdk_temp,
            "bootstrap paths"
        );

        let mut builder = self.process_env.to_builder();
        builder.lock(vars::COMMON_ROOT, bootstrap.common_root.as_str());
        builder.lock(vars::SDK_REPO, bootstrap.sdk_repo.as_str());
        builder.lock(vars::SDK_TEMP, bootstrap.sdk_temp.as_str());

        if let Some(Value::Object(env_vars)) = primary.get_mut("envVars") {
            seed_vars(&mut builder, env_vars.iter_mut(), "envVars");
        }
        seed_overlay_groups(&mut builder, &mut overlay);
        let env = builder.build();

        resolve_placeholders(&mut primary, &env);
        resolve_placeholders(&mut overlay, &env);

        let config: SdkConfig =
            serde_json::from_value(primary.clone()).map_err(|e| ConfigError::ConfigParse {
                path: "config".to_string(),
                message: e.to_string(),
            })?;
        let overlay_config: OverlayConfig =
            serde_json::from_value(overlay.clone()).map_err(|e| ConfigError::ConfigParse {
                path: "local config".to_string(),
                message: e.to_string(),
            })?;

        validate(&config)?;

        if config.settings.debug_config {
            debug!(config = %primary, "resolved config");
            debug!(local_config = %overlay, "resolved local config");
        }

        info!(
            language = %config.settings.swagger_codegen.language,
            vars = env.len(),
            "configuration resolved"
        );

        Ok(ResolvedConfig {
            common_root: self.common_root.clone(),
            bootstrap,
            config,
            overlay: overlay_config,
            env,
            document: primary,
        })
    }
}

/// The three computed working locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapPaths {
    pub common_root: Utf8PathBuf,
    pub sdk_repo: Utf8PathBuf,
    pub sdk_temp: Utf8PathBuf,
}

impl BootstrapPaths {
    pub fn compute(common_root: &Utf8Path, language: &str) -> Self {
        let language = language.trim();
        let under = |dir: &str| {
            let base = common_root.join(dir);
            if language.is_empty() {
                base
            } else {
                base.join(language)
            }
        };
        Self {
            common_root: common_root.to_path_buf(),
            sdk_repo: under("output"),
            sdk_temp: under("temp"),
        }
    }
}

fn apply_defaults(doc: &mut Value) -> Result<(), ConfigError> {
    let found = kind(doc);
    let root = doc
        .as_object_mut()
        .ok_or_else(|| ConfigError::invalid(format!("config must be a mapping, found {found}")))?;

    let settings = ensure_object(root, "settings")?;
    ensure_object(settings, "swagger")?;

    let stages = ensure_object(root, "stageSettings")?;
    for stage in ["prebuild", "build", "postbuild"] {
        ensure_object(stages, stage)?;
    }
    Ok(())
}

fn ensure_object<'a>(
    parent: &'a mut Map<String, Value>,
    key: &str,
) -> Result<&'a mut Map<String, Value>, ConfigError> {
    let slot = parent.entry(key).or_insert(Value::Null);
    if slot.is_null() {
        *slot = Value::Object(Map::new());
    }
    let found = kind(slot);
    slot.as_object_mut()
        .ok_or_else(|| ConfigError::invalid(format!("{key} must be a mapping, found {found}")))
}

fn raw_language(doc: &Value) -> String {
    doc.pointer("/settings/swaggerCodegen/language")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn seed_overlay_groups(builder: &mut EnvironmentBuilder, overlay: &mut Value) {
    let Some(Value::Object(groups)) = overlay.get_mut("envVars") else {
        return;
    };
    for (group_name, group) in groups.iter_mut() {
        let Value::Object(entries) = group else {
            warn!(group = %group_name, "ignoring envVars group that is not a mapping");
            continue;
        };
        if entries.get("groupDisabled").is_some_and(is_truthy) {
            debug!(group = %group_name, "skipping disabled envVars group");
            continue;
        }
        let group_vars = entries
            .iter_mut()
            .filter(|(name, _)| name.as_str() != "groupDisabled");
        seed_vars(builder, group_vars, group_name);
    }
}

/// Seed entries in declaration order. Each value is expanded against what is
/// already set, and string entries are rewritten with the expanded value.
fn seed_vars<'a>(
    builder: &mut EnvironmentBuilder,
    entries: impl Iterator<Item = (&'a String, &'a mut Value)>,
    origin: &str,
) {
    for (name, value) in entries {
        let Some(raw) = scalar_to_string(value) else {
            warn!(name = %name, origin = %origin, "ignoring non-scalar environment value");
            continue;
        };
        let expanded = substitute_with(&raw, |var| builder.get(var));
        if builder.set(name, expanded.as_str()) == SetOutcome::Locked {
            warn!(
                name = %name.trim(),
                origin = %origin,
                "cannot override bootstrap variable; keeping computed value"
            );
            continue;
        }
        debug!(name = %name.trim(), origin = %origin, "set environment variable");
        if value.is_string() {
            *value = Value::String(expanded);
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn validate(config: &SdkConfig) -> Result<(), ConfigError> {
    match &config.settings.sdk_repo {
        Some(RepoRef::Url(url)) if !url.trim().is_empty() => {}
        Some(RepoRef::Detailed { repo, .. }) if !repo.trim().is_empty() => {}
        _ => return Err(ConfigError::required("settings.sdkRepo")),
    }
    if config.settings.swagger.old_swagger_path.trim().is_empty() {
        return Err(ConfigError::required("settings.swagger.oldSwaggerPath"));
    }
    if config.settings.swagger.new_swagger_path.trim().is_empty() {
        return Err(ConfigError::required("settings.swagger.newSwaggerPath"));
    }
    Ok(())
}

/// Immutable outcome of resolution: typed config plus the environment snapshot.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    common_root: Utf8PathBuf,
    bootstrap: BootstrapPaths,
    config: SdkConfig,
    overlay: OverlayConfig,
    env: Environment,
    document: Value,
}

/// Per-language resource directories under `resources/sdk/<language>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    pub extensions: Utf8PathBuf,
    pub scripts: Utf8PathBuf,
    pub templates: Utf8PathBuf,
}

/// Notification catalog login details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub environment: String,
}

impl ResolvedConfig {
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn overlay(&self) -> &OverlayConfig {
        &self.overlay
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// The resolved primary document, as it was deserialized.
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn common_root(&self) -> &Utf8Path {
        &self.common_root
    }

    pub fn sdk_repo_dir(&self) -> &Utf8Path {
        &self.bootstrap.sdk_repo
    }

    pub fn sdk_temp_dir(&self) -> &Utf8Path {
        &self.bootstrap.sdk_temp
    }

    pub fn language(&self) -> &str {
        &self.config.settings.swagger_codegen.language
    }

    pub fn resources(&self) -> ResourcePaths {
        let base = self
            .common_root
            .join("resources")
            .join("sdk")
            .join(self.language());
        ResourcePaths {
            extensions: base.join("extensions"),
            scripts: base.join("scripts"),
            templates: base.join("templates"),
        }
    }

    /// Where the merged specification is written before generation.
    pub fn new_swagger_temp_file(&self) -> Utf8PathBuf {
        self.bootstrap.sdk_temp.join(NEW_SWAGGER_TEMP_FILE)
    }

    pub fn release_note_template(&self) -> Utf8PathBuf {
        match &self.config.settings.release_note_template_path {
            Some(path) => self.absolutize(path),
            None => self
                .common_root
                .join("resources")
                .join("templates")
                .join("releaseNoteDetail.md"),
        }
    }

    pub fn version_file(&self) -> Option<Utf8PathBuf> {
        self.config
            .settings
            .version_file
            .as_deref()
            .map(|p| self.absolutize(p))
    }

    /// Resolve a configured path against the common root unless already absolute.
    pub fn absolutize(&self, path: &str) -> Utf8PathBuf {
        let path = Utf8Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.common_root.join(path)
        }
    }

    /// `None` when either the client id or secret is unset.
    pub fn notification_credentials(&self) -> Option<NotificationCredentials> {
        Some(NotificationCredentials {
            client_id: self.env.get(vars::PURECLOUD_CLIENT_ID)?.to_string(),
            client_secret: self.env.get(vars::PURECLOUD_CLIENT_SECRET)?.to_string(),
            environment: self
                .env
                .get_or(vars::PURECLOUD_ENVIRONMENT, DEFAULT_PURECLOUD_ENVIRONMENT)
                .to_string(),
        })
    }

    pub fn exclude_notifications(&self) -> bool {
        self.env.flag(vars::EXCLUDE_NOTIFICATIONS)
    }

    pub fn logger_color(&self) -> bool {
        self.env.flag(vars::ENABLE_LOGGER_COLOR)
    }

    pub fn github_token(&self) -> Option<&str> {
        self.env.get(vars::GITHUB_TOKEN)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.config.settings.log_level.as_deref()
    }
}
