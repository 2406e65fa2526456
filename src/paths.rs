use std::path::PathBuf;

/// Default name of the local state directory
pub const INTERED_DIR: &str = ".intered";

/// Returns the local state directory.
///
/// Uses `INTERED_ROOT` when set, otherwise `.intered` in the working directory.
pub fn intered_root() -> PathBuf {
    if let Ok(root) = std::env::var("INTERED_ROOT") {
        PathBuf::from(root)
    } else {
        PathBuf::from(INTERED_DIR)
    }
}

/// Returns the path to the config file.
pub fn config_file() -> PathBuf {
    intered_root().join("config.yaml")
}

/// Returns the path to the mutation event log.
pub fn events_file() -> PathBuf {
    intered_root().join("events.ndjson")
}
