//! Camera-server connection settings and the process-wide configuration handle.
//!
//! Operations never read configuration fields ad hoc: they take one immutable
//! [`ServerConfig`] snapshot at start and keep it for their whole run. Reconfiguration replaces
//! the value wholesale through [`ConfigHandle::replace`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::camera::registry::CameraDevice;
use crate::fetch::credential::{AuthScheme, FetchCredential};
use crate::fetch::http::{DEFAULT_REQUEST_TIMEOUT, FetchOptions};
use crate::foundation::error::{CamsnapError, CamsnapResult};

/// Connection settings for the camera server.
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Server host name or IP.
    pub host: Option<String>,
    /// Server TCP port.
    pub port: Option<u16>,
    /// Use `https` instead of `http`.
    pub use_tls: bool,
    /// Login name.
    pub username: Option<String>,
    /// Password.
    pub password: Option<String>,
    /// Auth scheme; when unset, basic if a username is present and none otherwise.
    pub auth: Option<AuthScheme>,
    /// Skip TLS certificate verification. Off unless explicitly enabled.
    pub accept_invalid_certs: bool,
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            use_tls: false,
            username: None,
            password: None,
            auth: None,
            accept_invalid_certs: false,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

impl ServerConfig {
    /// `{scheme}://{host}:{port}`, or `None` while host or port is unset.
    pub fn base_url(&self) -> Option<String> {
        let host = self.host.as_deref().map(str::trim).filter(|h| !h.is_empty())?;
        let port = self.port?;
        let scheme = if self.use_tls { "https" } else { "http" };
        Some(format!("{scheme}://{host}:{port}"))
    }

    /// Like [`ServerConfig::base_url`], failing with a configuration error.
    pub fn require_base_url(&self) -> CamsnapResult<String> {
        self.base_url()
            .ok_or_else(|| CamsnapError::config("camera server host and port are not configured"))
    }

    /// Effective auth scheme after applying the username-based default.
    pub fn auth_scheme(&self) -> AuthScheme {
        match self.auth {
            Some(scheme) => scheme,
            None if self.username.as_deref().is_some_and(|u| !u.is_empty()) => AuthScheme::Basic,
            None => AuthScheme::None,
        }
    }

    /// Credentials for requests to the camera server.
    pub fn credential(&self) -> Option<FetchCredential> {
        match self.auth_scheme() {
            AuthScheme::None => None,
            scheme => Some(FetchCredential::new(
                scheme,
                self.username.clone(),
                self.password.clone(),
            )),
        }
    }

    /// Transport settings derived from this configuration.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            accept_invalid_certs: self.accept_invalid_certs,
        }
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("use_tls", &self.use_tls)
            .field("username", &self.username)
            .field(
                "password",
                &self
                    .password
                    .as_ref()
                    .map(|_| crate::fetch::credential::REDACTED_PASSWORD),
            )
            .field("auth", &self.auth)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// On-disk settings file: server connection plus the camera directory.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Camera server connection.
    pub server: ServerConfig,
    /// Known camera devices, in any supported registry format.
    pub cameras: Vec<CameraDevice>,
}

impl Settings {
    /// Parse settings from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CamsnapResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| CamsnapError::config(format!("parse settings JSON: {e}")))
    }

    /// Parse settings from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CamsnapResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CamsnapError::config(format!("open settings JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }
}

/// Shared, atomically replaceable server configuration.
#[derive(Debug, Default)]
pub struct ConfigHandle {
    current: RwLock<Arc<ServerConfig>>,
}

impl ConfigHandle {
    /// Wrap an initial configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// The configuration to use for one whole operation.
    pub fn snapshot(&self) -> Arc<ServerConfig> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the whole configuration, returning the previous value.
    ///
    /// Snapshots taken earlier keep seeing the old value.
    pub fn replace(&self, config: ServerConfig) -> Arc<ServerConfig> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        tracing::info!(configured = config.base_url().is_some(), "server configuration replaced");
        std::mem::replace(&mut *guard, Arc::new(config))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/mod.rs"]
mod tests;
