#![cfg(windows)]

use std::{
    fs,
    path::PathBuf,
    process::Command,
    thread,
    time::{Duration, Instant}
};

use sibling_launcher::{
    config::{LaunchConfig, LaunchMode},
    launcher::{Error, Launched, Launcher}
};
use tempfile::TempDir;

const TARGET: &str = r"bin\real.exe";
const BEHAVIOR_FILE: &str = "behavior.txt";

/// What this binary should do when it was copied in as the launched target.
fn target_behavior() -> Option<String> {
    let exe = std::env::current_exe().ok()?;
    if exe.file_name()? != "real.exe" {
        return None;
    }
    fs::read_to_string(exe.parent()?.join(BEHAVIOR_FILE)).ok()
}

// Runs only inside the copied target; every other test returns early there.
#[test]
fn behave_as_launched_target() {
    let Some(behavior) = target_behavior() else { return };
    match behavior.trim() {
        "sleep" => thread::sleep(Duration::from_secs(60)),
        code => std::process::exit(code.parse().unwrap_or(1))
    }
}

/// Lays out `<root>\My App\Launcher.exe` next to `bin\real.exe`, a copy of
/// this test binary told to act out `behavior`.
fn app_dir(behavior: &str) -> (TempDir, PathBuf) {
    let root = tempfile::tempdir().unwrap();
    let app = root.path().join("My App");
    let bin = app.join("bin");
    fs::create_dir_all(&bin).unwrap();

    fs::copy(std::env::current_exe().unwrap(), bin.join("real.exe")).unwrap();
    fs::write(bin.join(BEHAVIOR_FILE), behavior).unwrap();

    (root, app.join("Launcher.exe"))
}

/// Kills `pid`, reporting whether it was still running.
fn kill(pid: u32) -> bool {
    Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/F"])
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

#[test]
fn detached_launch_returns_while_target_runs() {
    if target_behavior().is_some() { return; }
    let (_root, self_path) = app_dir("sleep");
    let launcher = Launcher::new(LaunchConfig::new(TARGET));

    let started = Instant::now();
    let launched = launcher.launch_from(&self_path).unwrap();
    let elapsed = started.elapsed();

    let Launched::Detached { pid } = launched else {
        panic!("expected a detached launch, got {:?}", launched);
    };
    assert!(elapsed < Duration::from_secs(10), "launch blocked for {:?}", elapsed);
    assert!(kill(pid), "target {} was not running after the launch returned", pid);
}

#[test]
fn supervised_launch_forwards_exit_code() {
    if target_behavior().is_some() { return; }
    let (_root, self_path) = app_dir("3");
    let launcher = Launcher::new(LaunchConfig::new(TARGET).with_mode(LaunchMode::Supervise));

    assert_eq!(launcher.launch_from(&self_path).unwrap(), Launched::Exited { code: Some(3) });
    assert_eq!(launcher.run_from(&self_path), 3);
}

#[test]
fn missing_target_is_a_spawn_failure() {
    if target_behavior().is_some() { return; }
    let root = tempfile::tempdir().unwrap();
    let self_path = root.path().join("Launcher.exe");
    let launcher = Launcher::new(LaunchConfig::new(r"bin\missing.exe"));

    match launcher.launch_from(&self_path) {
        Err(Error::SpawnFailed { path, .. }) => assert_eq!(path, root.path().join("bin").join("missing.exe")),
        other => panic!("expected spawn failure, got {:?}", other)
    }
}
