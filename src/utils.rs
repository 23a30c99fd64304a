// ABOUTME: Utility functions for the fold-deck application
// ABOUTME: Path validation, output directory checks and file naming helpers

use crate::errors::{DeckError, Result};
use log::warn;
use std::path::{Path, PathBuf};

/// Validate that a file exists
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(DeckError::PathNotFoundError(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(DeckError::ValidationError(format!(
            "Path is not a file: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary.
///
/// Failures are configuration errors: nothing downstream can write without it.
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| {
            DeckError::ConfigError(format!("Cannot create directory {:?}: {}", path, e))
        })?;
    } else if !path.is_dir() {
        return Err(DeckError::ConfigError(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Validate that a directory can be listed and written to
pub fn validate_directory_writable(path: &Path) -> Result<()> {
    ensure_directory_exists(path)?;

    std::fs::read_dir(path).map_err(|e| {
        DeckError::ConfigError(format!("Directory is not readable: {:?} - {}", path, e))
    })?;

    // Uniquely named so concurrent runs never collide
    let probe = path.join(format!(".fold-deck-probe-{}.tmp", uuid::Uuid::new_v4()));
    match std::fs::File::create(&probe) {
        Ok(_) => {
            if let Err(e) = std::fs::remove_file(&probe) {
                warn!("Failed to clean up probe file {:?}: {}", probe, e);
            }
            Ok(())
        }
        Err(e) => Err(DeckError::ConfigError(format!(
            "Directory is not writable: {:?} - {}",
            path, e
        ))),
    }
}

/// Get the absolute path
pub fn get_absolute_path(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|e| {
        DeckError::ValidationError(format!("Failed to get absolute path for {:?}: {}", path, e))
    })
}

/// Turn a presentation title into a file-system-safe stem.
///
/// Spaces become underscores; anything other than ASCII alphanumerics,
/// `_` and `-` is dropped.
pub fn sanitize_title(title: &str) -> String {
    let stem: String = title
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if stem.is_empty() {
        "presentation".to_string()
    } else {
        stem
    }
}

/// Final path component of a relative asset reference.
pub fn file_name_of(reference: &str) -> Option<String> {
    Path::new(reference)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
