use std::{path::PathBuf, str::FromStr};

/// Relative path of the program to launch, baked in by the build script.
pub const BUILD_TARGET: &str = env!("LAUNCHER_TARGET");
const BUILD_MODE: &str = env!("LAUNCHER_MODE");
const BUILD_ON_FAILURE: &str = env!("LAUNCHER_ON_FAILURE");
const BUILD_PATH_CAPACITY: &str = env!("LAUNCHER_PATH_CAPACITY");

/// Fallback when the baked capacity is somehow unparsable. Matches the
/// longest extended-length path Windows accepts.
pub const DEFAULT_PATH_CAPACITY: usize = 32768;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LaunchMode {
    /// Start the target and return immediately without keeping its handles.
    #[default]
    Detach,
    /// Start the target, wait for it and forward its exit code.
    Supervise
}

impl LaunchMode {
    pub fn waits(&self) -> bool {
        matches!(self, LaunchMode::Supervise)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FailurePolicy {
    /// Log the error, tell the user and exit with a failure status.
    #[default]
    Report,
    /// Exit successfully as if the launch had worked.
    Ignore
}

#[derive(Debug, Eq, PartialEq)]
pub struct ParseSettingError(pub String);

impl std::fmt::Display for ParseSettingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unrecognized setting value: {}", self.0)
    }
}

impl std::error::Error for ParseSettingError {}

impl FromStr for LaunchMode {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detach" => Ok(LaunchMode::Detach),
            "supervise" => Ok(LaunchMode::Supervise),
            _ => Err(ParseSettingError(s.to_owned()))
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "report" => Ok(FailurePolicy::Report),
            "ignore" => Ok(FailurePolicy::Ignore),
            _ => Err(ParseSettingError(s.to_owned()))
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LaunchConfig {
    /// Target relator: path of the program to launch, relative to the
    /// directory holding the launcher.
    pub target: PathBuf,
    pub mode: LaunchMode,
    pub on_failure: FailurePolicy,
    /// Maximum length of the launcher's own path, terminator included.
    pub path_capacity: usize
}

impl LaunchConfig {
    pub fn new(target: impl Into<PathBuf>) -> LaunchConfig {
        LaunchConfig {
            target: target.into(),
            mode: LaunchMode::default(),
            on_failure: FailurePolicy::default(),
            path_capacity: DEFAULT_PATH_CAPACITY
        }
    }

    /// Settings baked in at build time (see `build.rs`).
    pub fn from_build() -> LaunchConfig {
        LaunchConfig {
            target: PathBuf::from(BUILD_TARGET),
            mode: BUILD_MODE.parse().unwrap_or_default(),
            on_failure: BUILD_ON_FAILURE.parse().unwrap_or_default(),
            path_capacity: BUILD_PATH_CAPACITY.parse().unwrap_or(DEFAULT_PATH_CAPACITY)
        }
    }

    pub fn with_mode(mut self, mode: LaunchMode) -> LaunchConfig {
        self.mode = mode;
        self
    }

    pub fn with_failure_policy(mut self, on_failure: FailurePolicy) -> LaunchConfig {
        self.on_failure = on_failure;
        self
    }

    pub fn with_path_capacity(mut self, path_capacity: usize) -> LaunchConfig {
        self.path_capacity = path_capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_launch_modes() {
        assert_eq!("detach".parse::<LaunchMode>(), Ok(LaunchMode::Detach));
        assert_eq!(" Supervise ".parse::<LaunchMode>(), Ok(LaunchMode::Supervise));
        assert!("wait".parse::<LaunchMode>().is_err());
    }

    #[test]
    fn parses_failure_policies() {
        assert_eq!("report".parse::<FailurePolicy>(), Ok(FailurePolicy::Report));
        assert_eq!("IGNORE".parse::<FailurePolicy>(), Ok(FailurePolicy::Ignore));
        assert_eq!("quiet".parse::<FailurePolicy>(), Err(ParseSettingError("quiet".into())));
    }

    #[test]
    fn new_uses_fire_and_forget_defaults() {
        let config = LaunchConfig::new("bin/app");
        assert_eq!(config.target, PathBuf::from("bin/app"));
        assert_eq!(config.mode, LaunchMode::Detach);
        assert_eq!(config.on_failure, FailurePolicy::Report);
        assert_eq!(config.path_capacity, DEFAULT_PATH_CAPACITY);
    }

    #[test]
    fn build_settings_are_valid() {
        let config = LaunchConfig::from_build();
        assert!(!config.target.as_os_str().is_empty());
        assert!(config.target.is_relative());
        assert!(config.path_capacity > 1);
        assert_eq!(BUILD_MODE.parse::<LaunchMode>().map(|_| ()), Ok(()));
        assert_eq!(BUILD_ON_FAILURE.parse::<FailurePolicy>().map(|_| ()), Ok(()));
    }
}
