#![windows_subsystem = "windows"]

use std::process::ExitCode;

use sibling_launcher::{config::LaunchConfig, i18n, launcher::Launcher, logging};

fn main() -> ExitCode {
    i18n::init();
    logging::init();

    let launcher = Launcher::new(LaunchConfig::from_build());
    ExitCode::from(launcher.run())
}
