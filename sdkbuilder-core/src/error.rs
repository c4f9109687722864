//! Error types for sdkbuilder-core.

use sdkbuilder_hooks::HookError;
use sdkbuilder_schema::SchemaError;
use sdkbuilder_types::Stage;
use std::time::Duration;
use thiserror::Error;

/// Why a stage stopped.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Hook(#[from] HookError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A variable a stage cannot run without is unset.
    #[error("environment variable {name} must be set")]
    MissingCredential { name: &'static str },

    /// Postbuild has no version to tag the release with.
    #[error("no version available for release: run prebuild first or configure settings.versionFile")]
    MissingVersion,

    /// A collaborator port or filesystem step failed.
    #[error("{0:#}")]
    Collaborator(#[from] anyhow::Error),
}

/// The error `full_build` propagates: the failing stage and how long it ran.
#[derive(Debug, Error)]
#[error("stage {stage} failed after {elapsed:.1?}: {source}")]
pub struct StageFailure {
    pub stage: Stage,
    pub elapsed: Duration,
    #[source]
    pub source: PipelineError,
}
