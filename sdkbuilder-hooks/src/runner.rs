use crate::error::HookError;
use crate::launcher::{LaunchRequest, ProcessLauncher};
use camino::{Utf8Path, Utf8PathBuf};
use sdkbuilder_types::{Environment, ScriptSpec, ScriptType};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Status recorded for an unsupported script type.
pub const UNSUPPORTED_STATUS: i32 = 1;

/// How a single hook ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookStatus {
    Succeeded,
    /// Nonzero exit (`Some(code)`), signal (`None`), or launch failure.
    Failed { code: Option<i32>, reason: String },
    /// The script type has no launcher; never fatal.
    Unsupported,
}

impl HookStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, HookStatus::Succeeded)
    }

    /// Numeric status in the style of a process exit code.
    pub fn code(&self) -> Option<i32> {
        match self {
            HookStatus::Succeeded => Some(0),
            HookStatus::Failed { code, .. } => *code,
            HookStatus::Unsupported => Some(UNSUPPORTED_STATUS),
        }
    }
}

/// Result of one hook, kept for diagnostics.
#[derive(Debug, Clone)]
pub struct ScriptOutcome {
    pub script: ScriptSpec,
    pub path: Utf8PathBuf,
    pub status: HookStatus,
    pub elapsed: Duration,
}

/// Executes hook lists strictly in order.
pub struct ScriptRunner<L> {
    script_root: Utf8PathBuf,
    env: Environment,
    launcher: L,
}

impl<L: ProcessLauncher> ScriptRunner<L> {
    pub fn new(script_root: impl Into<Utf8PathBuf>, env: Environment, launcher: L) -> Self {
        Self {
            script_root: script_root.into(),
            env,
            launcher,
        }
    }

    pub fn script_root(&self) -> &Utf8Path {
        &self.script_root
    }

    /// Absolute paths are used as-is; relative ones are joined to the script root.
    pub fn resolve_path(&self, script: &ScriptSpec) -> Utf8PathBuf {
        let path = Utf8Path::new(script.path.trim());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.script_root.join(path)
        }
    }

    /// Run `scripts` in order. Stops at the first missing script or the first
    /// failing `failOnError` script.
    pub fn run_scripts(
        &self,
        scripts: &[ScriptSpec],
        phase: &str,
    ) -> Result<Vec<ScriptOutcome>, HookError> {
        info!("Executing {} {}...", scripts.len(), phase_label(phase, scripts.len()));

        let mut outcomes = Vec::with_capacity(scripts.len());
        for script in scripts {
            outcomes.push(self.run_script(script)?);
        }
        Ok(outcomes)
    }

    /// Run one hook.
    pub fn run_script(&self, script: &ScriptSpec) -> Result<ScriptOutcome, HookError> {
        let started = Instant::now();
        let path = self.resolve_path(script);
        debug!(kind = %script.kind, path = %path, args = ?script.args, "executing script");

        if !path.exists() {
            error!("Script not found: {}", path);
            return Err(HookError::ScriptNotFound { path });
        }

        let program = match &script.kind {
            ScriptType::Node => "node",
            ScriptType::Shell => "sh",
            ScriptType::Other(kind) => {
                warn!("UNSUPPORTED SCRIPT TYPE: {}", kind);
                return Ok(ScriptOutcome {
                    script: script.clone(),
                    path,
                    status: HookStatus::Unsupported,
                    elapsed: started.elapsed(),
                });
            }
        };

        let request = LaunchRequest {
            program,
            script: &path,
            args: &script.args,
        };
        let status = match self.launcher.launch(&request, &self.env) {
            Ok(Some(0)) => HookStatus::Succeeded,
            Ok(Some(code)) => HookStatus::Failed {
                code: Some(code),
                reason: format!("exit code {code}"),
            },
            Ok(None) => HookStatus::Failed {
                code: None,
                reason: "terminated by signal".to_string(),
            },
            Err(err) => HookStatus::Failed {
                code: None,
                reason: format!("failed to launch {program}: {err}"),
            },
        };
        let elapsed = started.elapsed();

        match &status {
            HookStatus::Failed { reason, .. } => {
                error!("Script completed with {} in {:?}", reason, elapsed);
                if script.fail_on_error {
                    return Err(HookError::ScriptFailed {
                        path,
                        reason: reason.clone(),
                    });
                }
            }
            _ => debug!("Script completed with return code 0 in {:?}", elapsed),
        }

        Ok(ScriptOutcome {
            script: script.clone(),
            path,
            status,
            elapsed,
        })
    }
}

fn phase_label(phase: &str, count: usize) -> String {
    let noun = if count == 1 { "script" } else { "scripts" };
    let phase = phase.trim();
    if phase.is_empty() {
        noun.to_string()
    } else {
        format!("{phase} {noun}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_label_pluralizes() {
        assert_eq!(phase_label("compile", 1), "compile script");
        assert_eq!(phase_label(" custom prebuild pre-run ", 0), "custom prebuild pre-run scripts");
        assert_eq!(phase_label("", 3), "scripts");
    }

    #[test]
    fn unsupported_reports_status_one() {
        assert_eq!(HookStatus::Unsupported.code(), Some(1));
        assert!(!HookStatus::Unsupported.is_success());
    }
}
