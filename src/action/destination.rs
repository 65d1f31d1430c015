use std::path::PathBuf;

use anyhow::Context as _;

use crate::foundation::error::{CamsnapError, CamsnapResult};

/// Validate a user-supplied output path.
///
/// The path is trimmed and made absolute against the working directory. Its parent directory
/// must already exist; nothing is created here.
pub fn resolve_destination(raw: &str) -> CamsnapResult<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CamsnapError::config("destination path is empty"));
    }
    let path = std::path::absolute(trimmed)
        .with_context(|| format!("resolve destination '{trimmed}'"))?;
    if path.file_name().is_none() {
        return Err(CamsnapError::config(format!(
            "destination '{}' does not name a file",
            path.display()
        )));
    }
    match path.parent() {
        Some(dir) if dir.is_dir() => Ok(path),
        Some(dir) => Err(CamsnapError::config(format!(
            "destination directory '{}' does not exist",
            dir.display()
        ))),
        None => Err(CamsnapError::config(format!(
            "destination '{}' has no parent directory",
            path.display()
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/action/destination.rs"]
mod tests;
