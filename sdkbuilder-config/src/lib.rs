//! Configuration resolution for sdkbuilder.
//!
//! A primary document (YAML or JSON) and an optional overlay document are
//! loaded, their local `$ref` pointers expanded, and an immutable
//! [`Environment`](sdkbuilder_types::Environment) snapshot assembled from the
//! process environment, the bootstrap paths and the declared `envVars`. Every
//! `${NAME}` in a string value is then replaced from that snapshot.
//!
//! The process environment is read, never written.

pub mod deref;
pub mod error;
pub mod load;
pub mod model;
pub mod placeholders;
pub mod resolver;

pub use error::ConfigError;
pub use model::{
    BuildStage, CodegenSettings, EnvGroup, OverlayConfig, PostbuildStage, RepoRef, SdkConfig,
    Settings, StageHooks, StageSettings, SwaggerSettings,
};
pub use resolver::{
    BootstrapPaths, ConfigResolver, NotificationCredentials, ResolvedConfig, ResourcePaths,
};
