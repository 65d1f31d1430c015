//! What to fetch: a camera on the configured server, or a literal URL.

use crate::camera::resolver::CameraResolver;
use crate::config::ServerConfig;
use crate::fetch::credential::FetchCredential;
use crate::fetch::http::FetchRequest;
use crate::foundation::core::SizeBound;
use crate::foundation::error::{CamsnapError, CamsnapResult};

/// Slot values that mean "no source here".
pub const EMPTY_SLOTS: [&str; 2] = ["-1", "none"];

/// `{base}/++image?cameraNum={N}[&imageSize={px}]`.
///
/// The query parameters are the camera server's contract and must not change.
pub fn camera_image_url(base: &str, camera_num: &str, bound: SizeBound) -> String {
    let base = base.trim_end_matches('/');
    let mut url = format!("{base}/++image?cameraNum={camera_num}");
    if let Some(px) = bound.width() {
        url.push_str(&format!("&imageSize={px}"));
    }
    url
}

/// One logical origin of an image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// A camera on the configured server, resolved through a [`CameraResolver`].
    Camera {
        /// Camera reference as the user gave it.
        reference: String,
    },
    /// A literal URL with its own optional credentials.
    Url {
        /// Absolute `http`/`https` URL.
        url: String,
        /// Credentials for this URL only.
        credential: Option<FetchCredential>,
    },
}

impl ImageSource {
    /// A camera source.
    pub fn camera(reference: impl Into<String>) -> Self {
        Self::Camera {
            reference: reference.into(),
        }
    }

    /// A literal URL source.
    pub fn url(url: impl Into<String>, credential: Option<FetchCredential>) -> Self {
        Self::Url {
            url: url.into(),
            credential,
        }
    }

    /// Parse a configured slot.
    ///
    /// Blank, `"-1"`, and `"none"` are empty slots. Values with an `http(s)://` prefix are URLs;
    /// anything else is a camera reference.
    pub fn parse_slot(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || EMPTY_SLOTS.iter().any(|s| raw.eq_ignore_ascii_case(s)) {
            return None;
        }
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Some(Self::url(raw, None))
        } else {
            Some(Self::camera(raw))
        }
    }

    /// Return `true` when fetching this source needs the camera server configuration.
    pub fn needs_server(&self) -> bool {
        matches!(self, Self::Camera { .. })
    }

    /// Turn this source into a concrete fetch request.
    ///
    /// Camera sources ask the server for `bound` via `imageSize`. Fails when the server is not
    /// configured or the camera reference is unknown.
    pub fn resolve(
        &self,
        server: &ServerConfig,
        resolver: &dyn CameraResolver,
        bound: SizeBound,
    ) -> CamsnapResult<FetchRequest> {
        match self {
            Self::Camera { reference } => {
                let base = server.require_base_url()?;
                let camera = resolver.resolve(reference).ok_or_else(|| {
                    CamsnapError::config(format!("unknown camera '{reference}'"))
                })?;
                Ok(
                    FetchRequest::new(camera_image_url(&base, &camera.number, bound))
                        .with_credential(server.credential())
                        .named(camera.display_name),
                )
            }
            Self::Url { url, credential } => {
                Ok(FetchRequest::new(url.trim()).with_credential(credential.clone()))
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/source.rs"]
mod tests;
