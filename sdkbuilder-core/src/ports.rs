//! Port traits for every external collaborator of the pipeline.

use camino::{Utf8Path, Utf8PathBuf};
use sdkbuilder_types::notification::NotificationTopic;
use sdkbuilder_types::release::{ReleaseOptions, ReleaseRecord, RepoCoordinates};
use sdkbuilder_types::{Environment, VersionRecord};
use serde_json::Value;

/// A cloned working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryHandle {
    pub url: String,
    pub branch: Option<String>,
    pub dir: Utf8PathBuf,
}

/// Clone and commit/tag/push the SDK repository.
pub trait VersionControl {
    fn clone_repo(
        &self,
        repo: &str,
        branch: Option<&str>,
        dest: &Utf8Path,
    ) -> anyhow::Result<RepositoryHandle>;

    /// Commit everything under `dir`, tag it and push both.
    fn save_changes(&self, repo: &str, dir: &Utf8Path, tag: &str) -> anyhow::Result<()>;
}

/// Loads the old/new API schemas, classifies their difference and derives
/// the next version and release notes from it.
pub trait SchemaDiff {
    fn get_and_diff(
        &mut self,
        old: &str,
        new: &str,
        save_old: Option<&Utf8Path>,
        save_new: Option<&Utf8Path>,
    ) -> anyhow::Result<()>;

    fn increment_version(&self, version: &mut VersionRecord);

    fn stringify_version(&self, version: &VersionRecord) -> String;

    /// Render release notes from the template at `template`.
    fn generate_release_notes(
        &self,
        template: &Utf8Path,
        version: &VersionRecord,
    ) -> anyhow::Result<String>;

    /// The new specification, once `get_and_diff` has run.
    fn new_swagger(&self) -> Option<&Value>;

    fn new_swagger_mut(&mut self) -> Option<&mut Value>;
}

/// Source of notification topics and their payload schemas.
pub trait NotificationCatalog {
    fn available_topics(&self) -> anyhow::Result<Vec<NotificationTopic>>;
}

/// Inputs for one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorRequest {
    pub jar_path: Option<Utf8PathBuf>,
    pub input: Utf8PathBuf,
    pub language: String,
    pub output_dir: Utf8PathBuf,
    pub config_file: Option<Utf8PathBuf>,
    pub template_dir: Utf8PathBuf,
    pub extra_options: Vec<String>,
}

/// External SDK code generator.
pub trait CodeGenerator {
    fn generate(&self, request: &GeneratorRequest, env: &Environment) -> anyhow::Result<()>;
}

/// Packs a directory into a single archive file.
pub trait Archiver {
    /// Archive `src` and return the path of the archive written under `dest_dir`.
    fn archive_dir(&self, src: &Utf8Path, dest_dir: &Utf8Path) -> anyhow::Result<Utf8PathBuf>;
}

/// Publishes releases on the repository host.
pub trait ReleasePublisher {
    fn create_release(
        &self,
        repo: &RepoCoordinates,
        options: &ReleaseOptions,
    ) -> anyhow::Result<ReleaseRecord>;
}
