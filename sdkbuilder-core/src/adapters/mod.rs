//! Default implementations of the collaborator ports.

mod archive;
mod catalog;
mod diff;
mod generator;
mod git;
mod github;

pub use archive::TarGzArchiver;
pub use catalog::HttpNotificationCatalog;
pub use diff::{ChangeSummary, FsSchemaDiff, diff_specs, load_spec};
pub use generator::JavaCodeGenerator;
pub use git::ShellVersionControl;
pub use github::{DEFAULT_API_BASE, GithubReleasePublisher};
