/// A camera reference resolved to what the fetcher needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedCamera {
    /// Camera number as the server expects it in `cameraNum=`.
    pub number: String,
    /// Display name for logs.
    pub display_name: String,
}

/// Maps a logical camera reference to a camera number and a display name.
///
/// Implementations may be backed by any registry format; callers only see the resolved number.
pub trait CameraResolver {
    /// Resolve `camera_ref`, or `None` when it is unknown.
    fn resolve(&self, camera_ref: &str) -> Option<ResolvedCamera>;
}

/// Resolver with no registry: numeric references resolve to themselves.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualCameras;

impl CameraResolver for ManualCameras {
    fn resolve(&self, camera_ref: &str) -> Option<ResolvedCamera> {
        manual_camera(camera_ref)
    }
}

/// Fallback for references without a registry entry.
///
/// A plain number is a manually addressed camera; anything else is unknown.
pub fn manual_camera(camera_ref: &str) -> Option<ResolvedCamera> {
    let num: u32 = camera_ref.trim().parse().ok()?;
    Some(ResolvedCamera {
        number: num.to_string(),
        display_name: format!("camera {num}"),
    })
}
