use std::env;

const DEFAULT_PATH_CAPACITY: usize = 32768;

fn compile_resources() {
    println!("cargo:rerun-if-changed=assets");

    let version_info_str = env!("CARGO_PKG_VERSION");
    let version_info_ver = format!(
        "{},{},{},0",
        env!("CARGO_PKG_VERSION_MAJOR"),
        env!("CARGO_PKG_VERSION_MINOR"),
        env!("CARGO_PKG_VERSION_PATCH")
    );
    embed_resource::compile(
        "assets/launcher.rc",
        &[
            format!("VERSION_INFO_STR=\"{}\"", version_info_str),
            format!("VERSION_INFO_VER={}", version_info_ver)
        ]
    );
}

fn bake_setting(name: &str, default: &str, allowed: Option<&[&str]>) {
    println!("cargo:rerun-if-env-changed={}", name);

    let value = env::var(name).unwrap_or_else(|_| default.to_string());
    if let Some(allowed) = allowed {
        if !allowed.contains(&value.as_str()) {
            panic!("{} must be one of {:?}, got {:?}", name, allowed, value);
        }
    }
    println!("cargo:rustc-env={}={}", name, value);
}

fn set_launch_settings() {
    let target_is_windows = env::var("CARGO_CFG_TARGET_OS").map(|os| os == "windows").unwrap_or(false);
    let default_target = if target_is_windows { "bin\\app.exe" } else { "bin/app" };

    bake_setting("LAUNCHER_TARGET", default_target, None);
    bake_setting("LAUNCHER_MODE", "detach", Some(&["detach", "supervise"]));
    bake_setting("LAUNCHER_ON_FAILURE", "report", Some(&["report", "ignore"]));

    println!("cargo:rerun-if-env-changed=LAUNCHER_PATH_CAPACITY");
    let capacity = match env::var("LAUNCHER_PATH_CAPACITY") {
        Ok(value) => match value.parse::<usize>() {
            Ok(capacity) if capacity > 1 => capacity,
            _ => panic!("LAUNCHER_PATH_CAPACITY must be an integer greater than 1, got {:?}", value)
        },
        Err(_) => DEFAULT_PATH_CAPACITY
    };
    println!("cargo:rustc-env=LAUNCHER_PATH_CAPACITY={}", capacity);

    if env::var("LAUNCHER_TARGET").map(|t| t.is_empty()).unwrap_or(false) {
        panic!("LAUNCHER_TARGET must not be empty");
    }
}

fn main() {
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=locales");

    set_launch_settings();
    compile_resources();
}
