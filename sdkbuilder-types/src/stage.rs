use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// One of the three pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Prebuild,
    Build,
    Postbuild,
}

impl Stage {
    /// Every stage in the order a full build runs them.
    pub const ALL: [Stage; 3] = [Stage::Prebuild, Stage::Build, Stage::Postbuild];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Prebuild => "prebuild",
            Stage::Build => "build",
            Stage::Postbuild => "postbuild",
        }
    }

    /// Human-facing label used in stage banners ("STAGE: pre-build").
    pub fn label(self) -> &'static str {
        match self {
            Stage::Prebuild => "pre-build",
            Stage::Build => "build",
            Stage::Postbuild => "post-build",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stage that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResult {
    pub stage: Stage,
    pub elapsed: Duration,
}

/// Lifecycle of one orchestrator.
///
/// `Idle -> Prebuild -> Build -> Postbuild -> Complete`, or `Failed(stage)`
/// from whichever stage raised an unrecovered error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "stage", rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Prebuild,
    Build,
    Postbuild,
    Complete,
    Failed(Stage),
}

impl PipelineState {
    /// State while `stage` is executing.
    pub fn running(stage: Stage) -> Self {
        match stage {
            Stage::Prebuild => PipelineState::Prebuild,
            Stage::Build => PipelineState::Build,
            Stage::Postbuild => PipelineState::Postbuild,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Complete | PipelineState::Failed(_))
    }
}
