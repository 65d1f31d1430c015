use std::path::{Path, PathBuf};

/// Width cap for the bounded resize.
///
/// Raw values `<= 0` mean "use the source resolution"; this is the sentinel the request layer
/// receives from configuration and it maps to an unbounded value here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SizeBound(Option<u32>);

impl SizeBound {
    /// No resize requested.
    pub const UNBOUNDED: Self = Self(None);

    /// Build a bound from a raw pixel count; non-positive values are unbounded.
    pub fn from_raw(px: i64) -> Self {
        if px <= 0 {
            return Self::UNBOUNDED;
        }
        Self(Some(u32::try_from(px).unwrap_or(u32::MAX)))
    }

    /// Build a bound capping the width at `px` pixels (`0` is unbounded).
    pub fn max_width(px: u32) -> Self {
        Self::from_raw(i64::from(px))
    }

    /// The width cap in pixels, if any.
    pub fn width(self) -> Option<u32> {
        self.0
    }

    /// Return `true` when a cap is configured.
    pub fn is_bounded(self) -> bool {
        self.0.is_some()
    }
}

/// Unique identifier of one operation invocation.
///
/// Scopes temporary file names so concurrent operations sharing a destination directory never
/// collide.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OperationId(String);

impl OperationId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// The identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the temp file for source/frame `index` inside `dir`.
    pub fn temp_path(&self, dir: &Path, index: usize) -> PathBuf {
        dir.join(format!(".camsnap-{}-{index}.part", self.0))
    }

    /// Path of the scratch file the final output is written to before it is moved into place.
    pub fn output_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!(".camsnap-{}-out.part", self.0))
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
