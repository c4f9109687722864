//! The staged SDK pipeline.
//!
//! Every external effect goes through the ports in [`Collaborators`], so the
//! orchestrator itself only sequences work and moves files between the
//! output and temp directories.

use crate::adapters::{
    FsSchemaDiff, GithubReleasePublisher, HttpNotificationCatalog, JavaCodeGenerator,
    ShellVersionControl, TarGzArchiver,
};
use crate::error::{PipelineError, StageFailure};
use crate::ports::{
    Archiver, CodeGenerator, GeneratorRequest, NotificationCatalog, ReleasePublisher, SchemaDiff,
    VersionControl,
};
use crate::settings::PipelineSettings;
use crate::versioning::{load_version, save_version};
use crate::workspace::{copy_dir_recursive, empty_dir};
use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use sdkbuilder_config::{ResolvedConfig, StageHooks};
use sdkbuilder_hooks::{ProcessLauncher, ScriptRunner, SystemLauncher};
use sdkbuilder_schema::normalize_notifications;
use sdkbuilder_types::release::{ReleaseOptions, RepoCoordinates};
use sdkbuilder_types::{
    Environment, PipelineState, ScriptSpec, Stage, StageResult, VersionRecord, vars,
};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, info, warn};

const DEFAULT_RELEASE_TARGET: &str = "master";

/// The external systems a pipeline talks to.
pub struct Collaborators {
    pub vcs: Box<dyn VersionControl>,
    pub diff: Box<dyn SchemaDiff>,
    /// `None` when no catalog credentials are available.
    pub catalog: Option<Box<dyn NotificationCatalog>>,
    pub generator: Box<dyn CodeGenerator>,
    pub archiver: Box<dyn Archiver>,
    pub publisher: Box<dyn ReleasePublisher>,
    pub launcher: Box<dyn ProcessLauncher>,
}

impl Collaborators {
    /// Git, filesystem, HTTP and `java` backed adapters.
    pub fn defaults(resolved: &ResolvedConfig) -> Self {
        let token = resolved.github_token().map(str::to_string);
        Self {
            vcs: Box::new(ShellVersionControl::new(token.clone())),
            diff: Box::new(FsSchemaDiff::new()),
            catalog: resolved
                .notification_credentials()
                .map(|c| Box::new(HttpNotificationCatalog::new(c)) as Box<dyn NotificationCatalog>),
            generator: Box::new(JavaCodeGenerator),
            archiver: Box::new(TarGzArchiver),
            publisher: Box::new(GithubReleasePublisher::new(token)),
            launcher: Box::new(SystemLauncher),
        }
    }
}

type StageBody = fn(&mut PipelineOrchestrator) -> Result<(), PipelineError>;

/// Runs prebuild, build and postbuild against one resolved configuration.
pub struct PipelineOrchestrator {
    settings: PipelineSettings,
    env: Environment,
    ports: Collaborators,
    state: PipelineState,
    version: Option<VersionRecord>,
    release_notes: String,
}

impl PipelineOrchestrator {
    pub fn new(settings: PipelineSettings, env: Environment, ports: Collaborators) -> Self {
        Self {
            settings,
            env,
            ports,
            state: PipelineState::Idle,
            version: None,
            release_notes: String::new(),
        }
    }

    /// Orchestrator with the default adapters.
    pub fn from_resolved(resolved: &ResolvedConfig) -> Self {
        Self::new(
            PipelineSettings::from_resolved(resolved),
            resolved.env().clone(),
            Collaborators::defaults(resolved),
        )
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Version computed by prebuild or loaded by postbuild.
    pub fn version(&self) -> Option<&VersionRecord> {
        self.version.as_ref()
    }

    pub fn release_notes(&self) -> &str {
        &self.release_notes
    }

    /// Run every stage in order, stopping at the first failure.
    pub fn full_build(&mut self) -> Result<Vec<StageResult>, StageFailure> {
        let started = Instant::now();
        let mut results = Vec::with_capacity(Stage::ALL.len());
        for stage in Stage::ALL {
            results.push(self.run(stage)?);
        }
        info!("Full build completed in {:.1?}", started.elapsed());
        Ok(results)
    }

    pub fn run(&mut self, stage: Stage) -> Result<StageResult, StageFailure> {
        match stage {
            Stage::Prebuild => self.prebuild(),
            Stage::Build => self.build(),
            Stage::Postbuild => self.postbuild(),
        }
    }

    pub fn prebuild(&mut self) -> Result<StageResult, StageFailure> {
        self.run_stage(Stage::Prebuild, Self::prebuild_body)
    }

    pub fn build(&mut self) -> Result<StageResult, StageFailure> {
        self.run_stage(Stage::Build, Self::build_body)
    }

    pub fn postbuild(&mut self) -> Result<StageResult, StageFailure> {
        self.run_stage(Stage::Postbuild, Self::postbuild_body)
    }

    fn run_stage(&mut self, stage: Stage, body: StageBody) -> Result<StageResult, StageFailure> {
        info!("STAGE: {}", stage.label());
        self.state = PipelineState::running(stage);
        let started = Instant::now();

        let result = self.hooked(stage, body);
        let elapsed = started.elapsed();
        match result {
            Ok(()) => {
                info!("Stage {} completed in {:.1?}", stage, elapsed);
                if stage == Stage::Postbuild {
                    self.state = PipelineState::Complete;
                }
                Ok(StageResult { stage, elapsed })
            }
            Err(source) => {
                error!("Stage {} failed after {:.1?}: {}", stage, elapsed, source);
                self.state = PipelineState::Failed(stage);
                Err(StageFailure {
                    stage,
                    elapsed,
                    source,
                })
            }
        }
    }

    fn hooked(&mut self, stage: Stage, body: StageBody) -> Result<(), PipelineError> {
        let hooks = self.stage_hooks(stage).clone();
        self.run_hooks(&hooks.pre_run_scripts, &format!("custom {stage} pre-run"))?;
        body(self)?;
        self.run_hooks(&hooks.post_run_scripts, &format!("custom {stage} post-run"))?;
        Ok(())
    }

    fn stage_hooks(&self, stage: Stage) -> &StageHooks {
        match stage {
            Stage::Prebuild => &self.settings.prebuild,
            Stage::Build => &self.settings.build,
            Stage::Postbuild => &self.settings.postbuild,
        }
    }

    fn run_hooks(&self, scripts: &[ScriptSpec], phase: &str) -> Result<(), PipelineError> {
        let runner = ScriptRunner::new(
            self.settings.scripts_dir(),
            self.env.clone(),
            &*self.ports.launcher,
        );
        runner.run_scripts(scripts, phase)?;
        Ok(())
    }

    fn prebuild_body(&mut self) -> Result<(), PipelineError> {
        let settings = &self.settings;
        self.ports.vcs.clone_repo(
            &settings.repo_url,
            settings.branch.as_deref(),
            &settings.sdk_repo,
        )?;

        self.ports.diff.get_and_diff(
            &settings.old_swagger,
            &settings.new_swagger,
            settings.save_old_swagger.as_deref(),
            settings.save_new_swagger.as_deref(),
        )?;

        if settings.exclude_notifications {
            info!("Skipping notifications ({} is set)", vars::EXCLUDE_NOTIFICATIONS);
        } else {
            self.add_notifications()?;
        }

        self.write_new_swagger()?;
        self.next_version()?;
        Ok(())
    }

    fn missing_credential(&self) -> PipelineError {
        let name = [vars::PURECLOUD_CLIENT_ID, vars::PURECLOUD_CLIENT_SECRET]
            .into_iter()
            .find(|name| self.env.get(name).is_none())
            .unwrap_or(vars::PURECLOUD_CLIENT_ID);
        PipelineError::MissingCredential { name }
    }

    fn add_notifications(&mut self) -> Result<(), PipelineError> {
        let catalog = match self.ports.catalog.as_deref() {
            Some(catalog) => catalog,
            None => return Err(self.missing_credential()),
        };
        let topics = catalog
            .available_topics()
            .context("fetch notification topics")?;
        let spec = self
            .ports
            .diff
            .new_swagger_mut()
            .context("new specification has not been loaded")?;

        let normalized = normalize_notifications(&topics, spec)?;
        info!(
            definitions = normalized.report.inserted.len(),
            mappings = normalized.mappings.notifications.len(),
            skipped = normalized.skipped_topics.len(),
            "notification schemas merged"
        );

        let path = self.settings.notification_mappings_file();
        write_json(&path, &normalized.mappings, true)?;
        debug!(path = %path, "wrote notification mappings");
        Ok(())
    }

    fn write_new_swagger(&self) -> Result<(), PipelineError> {
        let spec: &Value = self
            .ports
            .diff
            .new_swagger()
            .context("new specification has not been loaded")?;
        let path = &self.settings.new_swagger_temp_file;
        info!("Writing new swagger to {}", path);
        write_json(path, spec, false)?;
        Ok(())
    }

    fn next_version(&mut self) -> Result<(), PipelineError> {
        let mut version = match &self.settings.version_file {
            Some(path) => load_version(path)?.unwrap_or_else(|| {
                warn!("Version file not found: {}", path);
                VersionRecord::default()
            }),
            None => {
                warn!("No version file configured; starting from the default version");
                VersionRecord::default()
            }
        };

        let diff = &self.ports.diff;
        info!("Previous version: {}", diff.stringify_version(&version));
        diff.increment_version(&mut version);
        info!("New version: {}", diff.stringify_version(&version));

        if let Some(path) = &self.settings.version_file {
            save_version(path, &version)?;
        }

        self.release_notes =
            diff.generate_release_notes(&self.settings.release_note_template, &version)?;
        self.version = Some(version);
        Ok(())
    }

    fn build_body(&mut self) -> Result<(), PipelineError> {
        let settings = &self.settings;
        let build_dir = settings.build_dir();
        empty_dir(&build_dir)?;

        let request = GeneratorRequest {
            jar_path: settings.jar_path.clone(),
            input: settings.new_swagger_temp_file.clone(),
            language: settings.language.clone(),
            output_dir: build_dir.clone(),
            config_file: settings.generator_config.clone(),
            template_dir: settings.resources.templates.clone(),
            extra_options: settings.extra_generator_options.clone(),
        };
        self.ports.generator.generate(&request, &self.env)?;

        let extensions = &settings.resources.extensions;
        match &settings.extensions_destination {
            Some(dest) if extensions.is_dir() => {
                let copied = copy_dir_recursive(extensions, dest)?;
                info!("Copied {} extension file(s) to {}", copied, dest);
            }
            Some(_) => debug!(path = %extensions, "no extensions directory"),
            None => debug!("no extensions destination configured"),
        }

        self.run_hooks(&settings.fatal_compile_scripts(), "compile")?;

        let docs = build_dir.join("docs");
        let readme = settings.sdk_repo.join("README.md");
        if readme.is_file() {
            copy_file(&readme, &docs.join("index.md"))?;
        }
        if docs.is_dir() {
            let archive = self.ports.archiver.archive_dir(&docs, &settings.sdk_temp)?;
            info!("Docs archived to {}", archive);
        } else {
            warn!("No docs generated at {}; skipping archive", docs);
        }
        Ok(())
    }

    /// The prebuild version, or the one persisted in the version file.
    fn release_version(&mut self) -> Result<VersionRecord, PipelineError> {
        if let Some(version) = &self.version {
            return Ok(version.clone());
        }
        let path = self
            .settings
            .version_file
            .as_ref()
            .ok_or(PipelineError::MissingVersion)?;
        let version = load_version(path)?.ok_or(PipelineError::MissingVersion)?;
        self.version = Some(version.clone());
        Ok(version)
    }

    fn postbuild_body(&mut self) -> Result<(), PipelineError> {
        if !self.settings.publish_release {
            warn!("Release publishing skipped: stageSettings.postbuild.publishRelease is not true");
            return Ok(());
        }

        let version = self.release_version()?;
        let tag = version.display();
        let settings = &self.settings;
        let repo = RepoCoordinates::from_url(&settings.repo_url).with_context(|| {
            format!("cannot derive owner/name from repository {:?}", settings.repo_url)
        })?;

        self.ports
            .vcs
            .save_changes(&settings.repo_url, &settings.sdk_repo, &tag)?;

        let options = ReleaseOptions {
            tag_name: tag.clone(),
            target_commitish: settings
                .branch
                .clone()
                .unwrap_or_else(|| DEFAULT_RELEASE_TARGET.to_string()),
            name: tag.clone(),
            body: format!("Release notes for version {}\n{}", tag, self.release_notes),
            draft: false,
            prerelease: false,
        };
        let release = self.ports.publisher.create_release(&repo, &options)?;
        info!(
            id = release.id,
            url = release.html_url.as_deref().unwrap_or_default(),
            "Created release {}",
            release.tag_name
        );
        Ok(())
    }
}

fn write_json<T: serde::Serialize>(
    path: &Utf8Path,
    value: &T,
    pretty: bool,
) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create parent dir for {}", path))?;
    }
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .with_context(|| format!("serialize {}", path))?;
    fs::write(path, json).with_context(|| format!("write {}", path))
}

fn copy_file(src: &Utf8Path, dest: &Utf8Path) -> anyhow::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create_dir_all {}", parent))?;
    }
    fs::copy(src, dest).with_context(|| format!("copy {} to {}", src, dest))?;
    Ok(())
}
