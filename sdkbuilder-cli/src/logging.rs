//! Subscriber setup. `RUST_LOG` wins; otherwise the level follows
//! `settings.logLevel` once the configuration has been resolved. Colour
//! follows `ENABLE_LOGGER_COLOR` from the resolved environment.

use std::io;
use tracing::warn;
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::layer::Layered;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

const DEFAULT_LEVEL: &str = "info";

type Filtered = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type StderrLayer = fmt::Layer<Filtered, DefaultFields, Format, fn() -> io::Stderr>;

/// Lets the level and colour be changed after startup. A level pinned by
/// `RUST_LOG` is never replaced.
pub struct LogHandle {
    filter: Option<reload::Handle<EnvFilter, Registry>>,
    output: reload::Handle<StderrLayer, Filtered>,
}

pub fn init(ansi: bool) -> LogHandle {
    let pinned = std::env::var_os("RUST_LOG").is_some();
    let filter = if pinned {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(DEFAULT_LEVEL)
    };
    let (filter, filter_handle) = reload::Layer::new(filter);
    let stderr: StderrLayer = fmt::layer()
        .with_ansi(ansi)
        .with_writer(io::stderr as fn() -> io::Stderr);
    let (output, output_handle) = reload::Layer::new(stderr);
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init();

    LogHandle {
        filter: (!pinned).then_some(filter_handle),
        output: output_handle,
    }
}

impl LogHandle {
    pub fn apply_color(&self, ansi: bool) {
        if let Err(err) = self.output.modify(|layer| layer.set_ansi(ansi)) {
            warn!("Failed to apply logger colour: {}", err);
        }
    }

    pub fn apply_config_level(&self, level: Option<&str>) {
        let (Some(handle), Some(level)) = (&self.filter, level) else {
            return;
        };
        let Some(directive) = directive_for(level) else {
            warn!("Unknown logLevel {:?}; keeping {}", level, DEFAULT_LEVEL);
            return;
        };
        if let Err(err) = handle.reload(EnvFilter::new(directive)) {
            warn!("Failed to apply logLevel {:?}: {}", level, err);
        }
    }
}

/// Filter directive for a configured level name.
pub fn directive_for(level: &str) -> Option<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "silly" | "trace" => Some("trace"),
        "verbose" | "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}
