//! camsnap fetches still images from networked security cameras and composes them.
//!
//! Three operations sit on top of one fetch layer:
//!
//! - [`run_download`]: one image from a camera or a URL to a local file
//! - [`run_stitch`]: up to ten sources stacked vertically into one image
//! - [`run_gif`]: one source captured on a timer and assembled into a looping GIF
//!
//! Each takes an [`ActionContext`] carrying a [`ServerConfig`] snapshot and the
//! [`ImageFetcher`]/[`CameraResolver`] seams, so orchestration runs the same against
//! [`HttpFetcher`] and test doubles.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Operations and their requests.
pub mod action;
/// Camera registries and reference resolution.
pub mod camera;
/// Server endpoint configuration and settings files.
pub mod config;
/// HTTP image fetching.
pub mod fetch;
/// Errors, shared value types, and cleanup helpers.
pub mod foundation;
/// Decoded frames, resize, stitch, and GIF assembly.
pub mod imaging;
/// Camera and URL image sources.
pub mod source;

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
pub(crate) mod testing;

pub use crate::action::capture::{CancelFlag, Clock, SystemClock};
pub use crate::action::destination::resolve_destination;
pub use crate::action::download::{DownloadRequest, run_download};
pub use crate::action::gif::{GifRequest, run_gif};
pub use crate::action::report::OperationReport;
pub use crate::action::stitch::{MAX_STITCH_SOURCES, StitchRequest, run_stitch};
pub use crate::action::ActionContext;
pub use crate::camera::registry::{CameraDevice, CameraDirectory, RegistryFormat};
pub use crate::camera::resolver::CameraResolver;
pub use crate::config::{ConfigHandle, ServerConfig, Settings};
pub use crate::fetch::credential::{AuthScheme, FetchCredential};
pub use crate::fetch::http::{FetchOptions, FetchRequest, HttpFetcher, ImageFetcher};
pub use crate::foundation::core::SizeBound;
pub use crate::foundation::error::{CamsnapError, CamsnapResult, FetchError};
pub use crate::source::ImageSource;
