// src/infra/paths.rs — Config file location
//
// RELAY_HOME overrides the home-relative default, which keeps tests and
// containers isolated from the operator's own files.

use std::path::PathBuf;

/// Returns the RELAY_HOME override, if set.
fn relay_home() -> Option<PathBuf> {
    std::env::var_os("RELAY_HOME").map(PathBuf::from)
}

/// Configuration directory: $RELAY_HOME/ or ~/.messenger-relay/
///
/// Falls back to the working directory when no home directory can be found.
pub fn config_dir() -> PathBuf {
    if let Some(home) = relay_home() {
        return home;
    }
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".messenger-relay"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Default config file path.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
