use crate::foundation::error::FetchError;

/// Text substituted for passwords in anything that gets logged.
pub const REDACTED_PASSWORD: &str = "<password removed from log>";

/// HTTP authentication scheme for an image fetch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// No authentication.
    #[default]
    None,
    /// HTTP Basic.
    Basic,
    /// HTTP Digest (answered after the server's 401 challenge).
    Digest,
}

impl AuthScheme {
    /// Lowercase scheme name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Digest => "digest",
        }
    }
}

impl std::str::FromStr for AuthScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "basic" => Ok(Self::Basic),
            "digest" => Ok(Self::Digest),
            other => Err(format!("unknown auth scheme '{other}'")),
        }
    }
}

/// Credentials attached to one fetch request.
#[derive(Clone, PartialEq, Eq)]
pub struct FetchCredential {
    /// Requested scheme.
    pub scheme: AuthScheme,
    /// Login name.
    pub username: Option<String>,
    /// Password; never logged.
    pub password: Option<String>,
}

impl FetchCredential {
    /// Build a credential for `scheme`.
    pub fn new(
        scheme: AuthScheme,
        username: impl Into<Option<String>>,
        password: impl Into<Option<String>>,
    ) -> Self {
        Self {
            scheme,
            username: username.into(),
            password: password.into(),
        }
    }

    /// Credential that sends nothing.
    pub fn none() -> Self {
        Self::new(AuthScheme::None, None, None)
    }

    /// Return the username/password pair the scheme needs.
    ///
    /// `Ok(None)` for [`AuthScheme::None`]. Fails when a scheme is requested without both values.
    pub fn pair(&self) -> Result<Option<(&str, &str)>, FetchError> {
        if self.scheme == AuthScheme::None {
            return Ok(None);
        }
        let user = self.username.as_deref().filter(|u| !u.is_empty());
        let pass = self.password.as_deref().filter(|p| !p.is_empty());
        match (user, pass) {
            (Some(u), Some(p)) => Ok(Some((u, p))),
            _ => Err(FetchError::MissingCredentials(self.scheme.as_str())),
        }
    }
}

impl std::fmt::Debug for FetchCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchCredential")
            .field("scheme", &self.scheme)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| REDACTED_PASSWORD))
            .finish()
    }
}

/// Render `url` for logs: keep the username, mask any password.
///
/// Parseable URLs are re-serialized without the password and the marker is spliced in after the
/// username. For unparseable input everything between `://` and the last `@` is treated as
/// userinfo; input without an `@` is returned unchanged.
pub fn redact_url(url: &str) -> String {
    let Ok(mut parsed) = reqwest::Url::parse(url) else {
        return redact_raw_userinfo(url);
    };
    if parsed.password().is_none() {
        return url.to_string();
    }
    if parsed.set_password(None).is_err() {
        return redact_raw_userinfo(url);
    }
    let mut out = parsed.to_string();
    let authority = parsed.scheme().len() + "://".len();
    match parsed.username() {
        "" => out.insert_str(authority, &format!(":{REDACTED_PASSWORD}@")),
        user => out.insert_str(authority + user.len(), &format!(":{REDACTED_PASSWORD}")),
    }
    out
}

fn redact_raw_userinfo(url: &str) -> String {
    let start = url.find("://").map_or(0, |i| i + "://".len());
    let Some(at) = url[start..].rfind('@').map(|i| start + i) else {
        return url.to_string();
    };
    let user = url[start..at].split_once(':').map_or("", |(user, _)| user);
    let masked = if user.is_empty() {
        REDACTED_PASSWORD.to_string()
    } else {
        format!("{user}:{REDACTED_PASSWORD}")
    };
    format!("{}{masked}{}", &url[..start], &url[at..])
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/credential.rs"]
mod tests;
