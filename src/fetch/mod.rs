//! Authenticated streaming download of one image to a local path.
//!
//! Everything else in the crate goes through the [`http::ImageFetcher`] seam, so orchestration
//! can be exercised against scripted fetchers.

/// Auth schemes, credentials, and log redaction.
pub mod credential;
/// The fetcher trait and its `reqwest` implementation.
pub mod http;
