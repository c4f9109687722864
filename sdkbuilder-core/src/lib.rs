//! Embeddable core library for sdkbuilder.
//!
//! Provides a clap-free pipeline that regenerates an SDK from an API
//! specification in three stages: prebuild (clone, diff, notifications,
//! versioning), build (code generation, compile hooks, docs archive) and
//! postbuild (tag and release).
//!
//! # Port traits
//!
//! Every external system is abstracted behind a trait in [`ports`]:
//! - [`VersionControl`](ports::VersionControl) clones and tags the SDK repository
//! - [`SchemaDiff`](ports::SchemaDiff) loads and diffs the specifications
//! - [`NotificationCatalog`](ports::NotificationCatalog) lists topic schemas
//! - [`CodeGenerator`](ports::CodeGenerator) runs the SDK generator
//! - [`Archiver`](ports::Archiver) packs generated docs
//! - [`ReleasePublisher`](ports::ReleasePublisher) creates releases
//!
//! The [`adapters`] module provides the default implementations.
//!
//! # Entry point
//!
//! [`PipelineOrchestrator`](pipeline::PipelineOrchestrator) runs stages
//! individually or as a [`full_build`](pipeline::PipelineOrchestrator::full_build).

pub mod adapters;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod settings;
pub mod versioning;
pub mod workspace;

pub use error::{PipelineError, StageFailure};
pub use pipeline::{Collaborators, PipelineOrchestrator};
pub use settings::PipelineSettings;

// Re-export so embedders don't need sdkbuilder-types directly.
pub use sdkbuilder_types::{PipelineState, Stage, StageResult, VersionRecord};
