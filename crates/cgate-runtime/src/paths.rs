//! Per-workspace state locations.
//!
//! All state lives under `<workspace>/.cgate/`.

use std::path::{Path, PathBuf};

/// State directory name inside the workspace.
pub const STATE_DIR: &str = ".cgate";

pub fn state_dir(workspace: &Path) -> PathBuf {
    workspace.join(STATE_DIR)
}

/// Gateway audit log.
pub fn audit_log_path(workspace: &Path) -> PathBuf {
    state_dir(workspace).join("gateway.log")
}

/// Terminal front end error log.
pub fn errors_log_path(workspace: &Path) -> PathBuf {
    state_dir(workspace).join("errors.log")
}

/// Persisted settings record.
pub fn settings_path(workspace: &Path) -> PathBuf {
    state_dir(workspace).join("settings.json")
}
