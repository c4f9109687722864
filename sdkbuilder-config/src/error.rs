use camino::Utf8PathBuf;
use thiserror::Error;

/// Failures while loading and resolving configuration. All are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The primary configuration file does not exist.
    #[error("config file doesn't exist: {path}")]
    ConfigMissing { path: Utf8PathBuf },

    /// A document could not be parsed or did not match the configuration model.
    #[error("failed to parse config {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// A required field is missing/empty, or a `$ref` could not be expanded.
    #[error("invalid config: {message}")]
    ConfigInvalid { message: String },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ConfigError::ConfigInvalid {
            message: message.into(),
        }
    }

    pub(crate) fn required(field: &str) -> Self {
        ConfigError::invalid(format!("{field} must be set"))
    }
}
