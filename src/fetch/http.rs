use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{AUTHORIZATION, WWW_AUTHENTICATE};

use crate::fetch::credential::{AuthScheme, FetchCredential, redact_url};
use crate::foundation::error::{CamsnapResult, FetchError};

/// Request timeout used unless configuration overrides it.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(100);

/// One image to download.
#[derive(Clone, Debug)]
pub struct FetchRequest {
    /// Absolute `http`/`https` URL.
    pub url: String,
    /// Optional credentials; `None` sends nothing.
    pub credential: Option<FetchCredential>,
    /// Human-readable name used for log and error attribution.
    pub source_name: String,
    /// Suppress the per-fetch "getting image" line.
    pub quiet: bool,
}

impl FetchRequest {
    /// Unauthenticated request for `url`, attributed to its redacted form.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            source_name: redact_url(&url),
            url,
            credential: None,
            quiet: false,
        }
    }

    /// Attach credentials.
    pub fn with_credential(mut self, credential: Option<FetchCredential>) -> Self {
        self.credential = credential;
        self
    }

    /// Set the attribution name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }
}

/// Downloads one image to a local path.
///
/// Implementations create or overwrite `dest` and return the number of bytes written. Expected
/// network failures come back as [`FetchError`] values.
pub trait ImageFetcher {
    /// Fetch `request` into `dest`.
    fn fetch(&self, request: &FetchRequest, dest: &Path) -> Result<u64, FetchError>;
}

/// Transport settings for [`HttpFetcher`].
#[derive(Clone, Debug)]
pub struct FetchOptions {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Skip TLS certificate verification (self-signed camera servers).
    pub accept_invalid_certs: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
            accept_invalid_certs: false,
        }
    }
}

/// Streaming HTTP(S) fetcher backed by a blocking `reqwest` client.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with the given transport settings.
    pub fn new(opts: &FetchOptions) -> CamsnapResult<Self> {
        if opts.accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled for image fetches");
        }
        let client = Client::builder()
            .timeout(opts.timeout)
            .danger_accept_invalid_certs(opts.accept_invalid_certs)
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }

    fn answer_digest_challenge(
        &self,
        url: &reqwest::Url,
        challenge: &Response,
        user: &str,
        pass: &str,
    ) -> Result<Response, FetchError> {
        let header = challenge
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok())
            .ok_or(FetchError::Status(StatusCode::UNAUTHORIZED.as_u16()))?;
        let mut prompt = digest_auth::parse(header)
            .map_err(|e| FetchError::Http(format!("parse digest challenge: {e}")))?;

        let uri = match url.query() {
            Some(q) => format!("{}?{q}", url.path()),
            None => url.path().to_string(),
        };
        let context = digest_auth::AuthContext::new(user, pass, uri.as_str());
        let answer = prompt
            .respond(&context)
            .map_err(|e| FetchError::Http(format!("answer digest challenge: {e}")))?;

        self.client
            .get(url.clone())
            .header(AUTHORIZATION, answer.to_header_string())
            .send()
            .map_err(classify)
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, request: &FetchRequest, dest: &Path) -> Result<u64, FetchError> {
        let url = parse_http_url(&request.url)?;
        let scheme = request
            .credential
            .as_ref()
            .map_or(AuthScheme::None, |c| c.scheme);
        let pair = match &request.credential {
            Some(c) => c.pair()?,
            None => None,
        };

        if !request.quiet {
            tracing::info!(
                source = %request.source_name,
                url = %redact_url(&request.url),
                dest = %dest.display(),
                auth = scheme.as_str(),
                user = pair.map(|(u, _)| u).unwrap_or(""),
                "getting image"
            );
        }

        let mut builder = self.client.get(url.clone());
        if let (AuthScheme::Basic, Some((user, pass))) = (scheme, pair) {
            builder = builder.basic_auth(user, Some(pass));
        }
        let mut response = builder.send().map_err(|e| log_failure(request, classify(e)))?;

        if scheme == AuthScheme::Digest
            && response.status() == StatusCode::UNAUTHORIZED
            && let Some((user, pass)) = pair
        {
            response = self
                .answer_digest_challenge(&url, &response, user, pass)
                .map_err(|e| log_failure(request, e))?;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(log_failure(request, FetchError::Status(status.as_u16())));
        }

        let file = File::create(dest).map_err(|e| log_failure(request, e.into()))?;
        let mut writer = BufWriter::new(file);
        let written = response
            .copy_to(&mut writer)
            .map_err(|e| log_failure(request, classify(e)))?;
        writer.flush().map_err(|e| log_failure(request, e.into()))?;

        tracing::debug!(source = %request.source_name, bytes = written, "completed");
        Ok(written)
    }
}

/// Accept only absolute `http`/`https` URLs.
pub fn parse_http_url(raw: &str) -> Result<reqwest::Url, FetchError> {
    let url = reqwest::Url::parse(raw.trim()).map_err(|_| FetchError::InvalidUrl(redact_url(raw)))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(FetchError::InvalidUrl(redact_url(raw))),
    }
}

fn classify(mut err: reqwest::Error) -> FetchError {
    // reqwest renders the request URL, inline userinfo included.
    if let Some(url) = err.url_mut() {
        let _ = url.set_password(None);
    }
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_connect() {
        FetchError::Connection(err.to_string())
    } else {
        FetchError::Http(err.to_string())
    }
}

fn log_failure(request: &FetchRequest, err: FetchError) -> FetchError {
    tracing::error!(source = %request.source_name, error = %err, "error getting image");
    err
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/http.rs"]
mod tests;
