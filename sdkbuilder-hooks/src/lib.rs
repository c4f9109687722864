//! Hook script execution for sdkbuilder stages.
//!
//! Hooks run one at a time, in declaration order. A missing script always
//! aborts the phase; a failing script aborts it only when `failOnError` is set.

pub mod error;
pub mod launcher;
pub mod runner;

pub use error::HookError;
pub use launcher::{LaunchRequest, ProcessLauncher, SystemLauncher};
pub use runner::{HookStatus, ScriptOutcome, ScriptRunner, UNSUPPORTED_STATUS};
