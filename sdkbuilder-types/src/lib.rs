//! Shared DTOs for the sdkbuilder workspace.
//!
//! # Design constraints
//! - Types that appear in configuration or on disk keep the camelCase field
//!   names of the documents they are read from.
//! - Nothing in here performs I/O.

pub mod de;
pub mod env;
pub mod notification;
pub mod release;
pub mod script;
pub mod stage;
pub mod version;

pub use env::{Environment, EnvironmentBuilder, SetOutcome};
pub use script::{ScriptSpec, ScriptType};
pub use stage::{PipelineState, Stage, StageResult};
pub use version::{VersionBump, VersionRecord};

/// Well-known environment variable names.
pub mod vars {
    /// Absolute path of the directory the pipeline runs from.
    pub const COMMON_ROOT: &str = "COMMON_ROOT";
    /// Clone/output directory of the SDK repository for the target language.
    pub const SDK_REPO: &str = "SDK_REPO";
    /// Scratch directory for intermediate files for the target language.
    pub const SDK_TEMP: &str = "SDK_TEMP";

    pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
    pub const PURECLOUD_CLIENT_ID: &str = "PURECLOUD_CLIENT_ID";
    pub const PURECLOUD_CLIENT_SECRET: &str = "PURECLOUD_CLIENT_SECRET";
    pub const PURECLOUD_ENVIRONMENT: &str = "PURECLOUD_ENVIRONMENT";
    pub const EXCLUDE_NOTIFICATIONS: &str = "EXCLUDE_NOTIFICATIONS";
    pub const JAVA_OPTS: &str = "JAVA_OPTS";
    pub const ENABLE_LOGGER_COLOR: &str = "ENABLE_LOGGER_COLOR";

    /// Variables computed by the resolver that configuration may never override.
    pub const BOOTSTRAP: [&str; 3] = [COMMON_ROOT, SDK_REPO, SDK_TEMP];
}
