/// Convenience result type used across camsnap.
pub type CamsnapResult<T> = Result<T, CamsnapError>;

/// Top-level error taxonomy used by the acquisition and composition operations.
#[derive(thiserror::Error, Debug)]
pub enum CamsnapError {
    /// Endpoint not configured, unusable destination, or an invalid request.
    ///
    /// Raised before any network activity and never retried.
    #[error("configuration error: {0}")]
    Config(String),

    /// A fetch failed in a context where it cannot be skipped (single-source download).
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Nothing usable reached the stitcher or the GIF assembler.
    #[error("composition error: {0}")]
    Composition(String),

    /// The operation's cancellation flag was raised before it produced output.
    #[error("operation cancelled")]
    Cancelled,

    /// Wrapped filesystem or codec error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CamsnapError {
    /// Build a [`CamsnapError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`CamsnapError::Composition`] value.
    pub fn composition(msg: impl Into<String>) -> Self {
        Self::Composition(msg.into())
    }
}

/// Failure of a single image fetch.
///
/// These are scoped to one source or one frame; orchestrators log and skip them.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("the request timed out")]
    Timeout,

    /// The server answered with a non-2xx status.
    #[error("server responded with status {0}")]
    Status(u16),

    /// The server could not be reached.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Any other transport-level failure (TLS, malformed response, body read).
    #[error("http error: {0}")]
    Http(String),

    /// An auth scheme was requested without both a username and a password.
    #[error("{0} authentication requires both a username and a password")]
    MissingCredentials(&'static str),

    /// The URL is not a well-formed `http`/`https` URL.
    #[error("invalid url '{0}'")]
    InvalidUrl(String),

    /// The fetched payload could not be decoded as an image.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The destination file could not be written.
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
