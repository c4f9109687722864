//! Clap-free settings for the pipeline, derived from a resolved configuration.

use camino::{Utf8Path, Utf8PathBuf};
use sdkbuilder_config::{ResolvedConfig, ResourcePaths, StageHooks};
use sdkbuilder_types::ScriptSpec;

/// Everything the stages read, with paths already made absolute.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub common_root: Utf8PathBuf,
    pub sdk_repo: Utf8PathBuf,
    pub sdk_temp: Utf8PathBuf,

    // Repository
    pub repo_url: String,
    pub branch: Option<String>,

    // Schemas
    pub old_swagger: String,
    pub new_swagger: String,
    pub save_old_swagger: Option<Utf8PathBuf>,
    pub save_new_swagger: Option<Utf8PathBuf>,
    pub new_swagger_temp_file: Utf8PathBuf,
    pub exclude_notifications: bool,

    // Versioning
    pub version_file: Option<Utf8PathBuf>,
    pub release_note_template: Utf8PathBuf,

    // Generation
    pub language: String,
    pub resources: ResourcePaths,
    pub jar_path: Option<Utf8PathBuf>,
    pub generator_config: Option<Utf8PathBuf>,
    pub extra_generator_options: Vec<String>,
    pub extensions_destination: Option<Utf8PathBuf>,

    // Hooks
    pub prebuild: StageHooks,
    pub build: StageHooks,
    pub compile_scripts: Vec<ScriptSpec>,
    pub postbuild: StageHooks,
    pub publish_release: bool,
}

impl PipelineSettings {
    pub fn from_resolved(resolved: &ResolvedConfig) -> Self {
        let config = resolved.config();
        let settings = &config.settings;
        let stages = &config.stage_settings;
        let path = |p: &Option<String>| p.as_deref().map(|p| resolved.absolutize(p));

        let (repo_url, branch) = match &settings.sdk_repo {
            Some(repo) => (repo.repo().to_string(), repo.branch().map(str::to_string)),
            None => (String::new(), None),
        };

        Self {
            common_root: resolved.common_root().to_path_buf(),
            sdk_repo: resolved.sdk_repo_dir().to_path_buf(),
            sdk_temp: resolved.sdk_temp_dir().to_path_buf(),
            repo_url,
            branch,
            old_swagger: settings.swagger.old_swagger_path.clone(),
            new_swagger: settings.swagger.new_swagger_path.clone(),
            save_old_swagger: path(&settings.swagger.save_old_swagger_path),
            save_new_swagger: path(&settings.swagger.save_new_swagger_path),
            new_swagger_temp_file: resolved.new_swagger_temp_file(),
            exclude_notifications: resolved.exclude_notifications(),
            version_file: resolved.version_file(),
            release_note_template: resolved.release_note_template(),
            language: resolved.language().to_string(),
            resources: resolved.resources(),
            jar_path: path(&settings.swagger_codegen.jar_path),
            generator_config: path(&settings.swagger_codegen.config_file),
            extra_generator_options: settings.swagger_codegen.extra_generator_options.clone(),
            extensions_destination: path(&settings.extensions_destination),
            prebuild: stages.prebuild.clone(),
            build: stages.build.hooks.clone(),
            compile_scripts: stages.build.compile_scripts.clone(),
            postbuild: stages.postbuild.hooks.clone(),
            publish_release: stages.postbuild.publish_release,
        }
    }

    /// Generator output directory.
    pub fn build_dir(&self) -> Utf8PathBuf {
        self.sdk_repo.join("build")
    }

    pub fn notification_mappings_file(&self) -> Utf8PathBuf {
        self.sdk_repo.join("notificationMappings.json")
    }

    pub fn scripts_dir(&self) -> &Utf8Path {
        &self.resources.scripts
    }

    /// Compile scripts with `failOnError` forced on.
    pub fn fatal_compile_scripts(&self) -> Vec<ScriptSpec> {
        self.compile_scripts
            .iter()
            .cloned()
            .map(|s| s.fail_on_error(true))
            .collect()
    }
}
