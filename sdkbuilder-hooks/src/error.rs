use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookError {
    /// The resolved script path does not exist. Fatal regardless of `failOnError`.
    #[error("script not found: {path}")]
    ScriptNotFound { path: Utf8PathBuf },

    /// A `failOnError` script exited nonzero or could not be launched.
    #[error("script failed ({reason}); aborting: {path}")]
    ScriptFailed { path: Utf8PathBuf, reason: String },
}
