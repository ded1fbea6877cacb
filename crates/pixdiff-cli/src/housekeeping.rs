//! Output and log directory upkeep around a run

use crate::error::{CliError, CliResult};
use std::fs;
use std::path::Path;

/// Create `dir` if it does not exist, returning whether it was created.
///
/// Fails when `dir` exists but is not a directory.
pub fn ensure_dir(dir: &Path) -> CliResult<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    if dir.exists() {
        return Err(CliError::config(format!(
            "{} exists and is not a directory",
            dir.display()
        )));
    }
    fs::create_dir_all(dir)?;
    Ok(true)
}

/// Delete the regular files directly inside `dir`, returning how many.
///
/// Subdirectories are left alone.
pub fn clear_dir_files(dir: &Path) -> CliResult<usize> {
    let mut deleted = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            fs::remove_file(&path)?;
            deleted += 1;
        }
    }
    tracing::debug!(dir = %dir.display(), deleted, "cleared output directory");
    Ok(deleted)
}
