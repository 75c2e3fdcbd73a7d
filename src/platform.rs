//! State directory resolution.
//!
//! The keypad state lives next to the config under the home directory,
//! with fallbacks for environments where home is not writable.

use crate::config::APP_DIR;
use crate::state::StateFile;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the state directory with cross-platform fallback chain.
///
/// Priority order:
/// 1. Explicit override (from config)
/// 2. Home directory (~/.hms-keypad)
/// 3. Platform-specific data directory (XDG on Linux, AppData on Windows)
/// 4. Current working directory
pub fn get_state_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        ensure_writable(dir)?;
        return Ok(dir.to_path_buf());
    }

    if let Some(home) = home::home_dir() {
        let dir = home.join(APP_DIR);
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
        tracing::warn!(dir = %dir.display(), "state directory not writable, trying fallbacks");
    }

    if let Some(data) = dirs::data_local_dir() {
        let dir = data.join("hms-keypad");
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
    }

    let dir = PathBuf::from(APP_DIR);
    ensure_writable(&dir).context(
        "Cannot create state directory in any location. \
         Check file permissions or set state.state_dir_override in config.",
    )?;
    Ok(dir)
}

/// Ensure a directory exists and is writable by the current user.
pub fn ensure_writable(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let test_path = dir.join(".write_test");
    fs::write(&test_path, b"test")
        .with_context(|| format!("Directory {} is not writable", dir.display()))?;

    // ignore: the probe may still be held open by a virus scanner on Windows
    let _ = fs::remove_file(&test_path);

    Ok(())
}

/// The state file in the resolved state directory.
pub fn state_file(state_dir_override: Option<&Path>) -> Result<StateFile> {
    let state_dir = get_state_dir(state_dir_override)?;
    Ok(StateFile::in_dir(&state_dir))
}
