use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::CamsnapResult;

/// Run a cleanup step whose failure must never fail the surrounding operation.
///
/// Errors are logged at debug level and dropped.
pub fn best_effort<E: std::fmt::Display>(what: &str, result: Result<(), E>) {
    if let Err(e) = result {
        tracing::debug!(step = what, error = %e, "best-effort cleanup failed");
    }
}

/// Remove `path`, ignoring a missing file and logging any other failure.
pub fn remove_file_best_effort(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed temp file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => best_effort("remove temp file", Err(e)),
    }
}

/// A scratch file that is removed when dropped unless it has been persisted.
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
    armed: bool,
}

impl TempFile {
    /// Claim `path` as a temp file. Nothing is created on disk.
    pub fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    /// The scratch path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move the scratch file to `dest`, replacing anything already there.
    pub fn persist(mut self, dest: &Path) -> CamsnapResult<()> {
        std::fs::rename(&self.path, dest).with_context(|| {
            format!(
                "move '{}' into place at '{}'",
                self.path.display(),
                dest.display()
            )
        })?;
        self.armed = false;
        Ok(())
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if self.armed {
            remove_file_best_effort(&self.path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/cleanup.rs"]
mod tests;
