use std::{io, path::{Component, Path, PathBuf}};

use crate::config::{FailurePolicy, LaunchConfig};
use crate::i18n::t;
use crate::utils;

/// Exit status when the launch failed and the failure is reported.
pub const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Launched {
    /// The child was started and left running on its own.
    Detached { pid: u32 },
    /// The child ran to completion. `None` if it was killed without an exit code.
    Exited { code: Option<i32> }
}

pub struct Launcher {
    config: LaunchConfig
}

impl Launcher {
    pub fn new(config: LaunchConfig) -> Launcher {
        Launcher { config }
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    /// Absolute path of the target next to the given launcher path.
    pub fn target_for(&self, self_path: &Path) -> Result<PathBuf, Error> {
        compose_target_path(self_path, &self.config.target)
    }

    /// Absolute path of the target next to the running executable.
    pub fn resolve_target(&self) -> Result<PathBuf, Error> {
        let self_path = utils::current_exe_path(self.config.path_capacity)?;
        tracing::debug!(path = %self_path.display(), "Resolved launcher path");
        self.target_for(&self_path)
    }

    pub fn launch(&self) -> Result<Launched, Error> {
        let target = self.resolve_target()?;
        self.spawn(&target)
    }

    /// Same as [`Launcher::launch`], but as if the launcher lived at `self_path`.
    pub fn launch_from(&self, self_path: &Path) -> Result<Launched, Error> {
        let target = self.target_for(self_path)?;
        self.spawn(&target)
    }

    fn spawn(&self, target: &Path) -> Result<Launched, Error> {
        tracing::info!(path = %target.display(), mode = ?self.config.mode, "Launching");
        if self.config.mode.waits() {
            tracing::debug!("Waiting for the target to exit");
        }
        utils::spawn(target, self.config.mode)
    }

    /// Launches the target and turns the outcome into the process exit status.
    pub fn run(&self) -> u8 {
        self.finish(self.launch())
    }

    pub fn run_from(&self, self_path: &Path) -> u8 {
        self.finish(self.launch_from(self_path))
    }

    fn finish(&self, result: Result<Launched, Error>) -> u8 {
        match result {
            Ok(Launched::Detached { pid }) => {
                tracing::info!(pid, "Target started");
                0
            }
            Ok(Launched::Exited { code }) => {
                tracing::info!(?code, "Target exited");
                exit_status(code)
            }
            Err(e) => match self.config.on_failure {
                FailurePolicy::Report => {
                    tracing::error!(error = %e, "Launch failed");
                    utils::show_error(&e.to_string());
                    EXIT_FAILURE
                }
                FailurePolicy::Ignore => {
                    tracing::debug!(error = %e, "Launch failed, ignoring");
                    0
                }
            }
        }
    }
}

/// Replaces the last component of `self_path` with the relative `target`.
pub fn compose_target_path(self_path: &Path, target: &Path) -> Result<PathBuf, Error> {
    // A drive prefix ("C:bin") or root makes `join` discard the directory.
    let anchored = target.components().any(|c| matches!(c, Component::Prefix(_) | Component::RootDir));
    if target.as_os_str().is_empty() || anchored {
        return Err(Error::InvalidTarget(target.to_path_buf()));
    }

    match self_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => Ok(dir.join(target)),
        _ => Err(Error::NoParentDir(self_path.to_path_buf()))
    }
}

/// Exit status forwarded from a supervised child.
pub fn exit_status(code: Option<i32>) -> u8 {
    match code {
        Some(code) => u8::try_from(code).unwrap_or(EXIT_FAILURE),
        None => EXIT_FAILURE
    }
}

#[derive(Debug)]
pub enum Error {
    SelfPathUnavailable(io::Error),
    SelfPathTruncated { capacity: usize },
    NoParentDir(PathBuf),
    InvalidTarget(PathBuf),
    SpawnFailed { path: PathBuf, source: io::Error },
    WaitFailed(io::Error)
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::SelfPathUnavailable(e) => write!(f, "{}", t!("error.self_path_unavailable", error = e)),
            Error::SelfPathTruncated { capacity } => write!(f, "{}", t!("error.self_path_truncated", capacity = capacity)),
            Error::NoParentDir(path) => write!(f, "{}", t!("error.no_parent_dir", path = path.display())),
            Error::InvalidTarget(path) => write!(f, "{}", t!("error.invalid_target", path = path.display())),
            Error::SpawnFailed { path, source } => write!(f, "{}", t!("error.spawn_failed", path = path.display(), error = source)),
            Error::WaitFailed(e) => write!(f, "{}", t!("error.wait_failed", error = e))
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::SelfPathUnavailable(e) | Error::WaitFailed(e) => Some(e),
            Error::SpawnFailed { source, .. } => Some(source),
            _ => None
        }
    }
}
