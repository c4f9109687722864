//! Process launching seam.

use camino::Utf8Path;
use sdkbuilder_types::Environment;
use std::io;
use std::process::Command;

/// One child process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest<'a> {
    pub program: &'a str,
    pub script: &'a Utf8Path,
    pub args: &'a [String],
}

/// Runs a child process to completion.
///
/// Returns the exit code, or `None` when the process was terminated by a signal.
pub trait ProcessLauncher {
    fn launch(&self, request: &LaunchRequest<'_>, env: &Environment) -> io::Result<Option<i32>>;
}

/// Spawns real processes with inherited stdio. The child sees the parent's
/// environment overlaid with the snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, request: &LaunchRequest<'_>, env: &Environment) -> io::Result<Option<i32>> {
        let status = Command::new(request.program)
            .arg(request.script.as_str())
            .args(request.args)
            .envs(env.iter())
            .status()?;
        Ok(status.code())
    }
}

impl<T: ProcessLauncher + ?Sized> ProcessLauncher for &T {
    fn launch(&self, request: &LaunchRequest<'_>, env: &Environment) -> io::Result<Option<i32>> {
        (**self).launch(request, env)
    }
}

impl<T: ProcessLauncher + ?Sized> ProcessLauncher for Box<T> {
    fn launch(&self, request: &LaunchRequest<'_>, env: &Environment) -> io::Result<Option<i32>> {
        (**self).launch(request, env)
    }
}
