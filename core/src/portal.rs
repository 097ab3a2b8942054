//! Admin portal endpoint and the credential sent with every request.

use std::fmt;

use url::Url;
use zeroize::Zeroize;

use crate::error::ClientError;

/// Base endpoint of a 3scale admin portal: scheme, host and optional port.
///
/// Validated once at construction; every request URL is joined onto it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPortal {
    base_url: Url,
}

impl AdminPortal {
    pub fn new(scheme: &str, host: &str, port: Option<u16>) -> Result<Self, ClientError> {
        if !matches!(scheme, "http" | "https") {
            return Err(ClientError::InvalidPortal(format!(
                "unsupported scheme {scheme:?}, expected http or https"
            )));
        }
        if host.trim().is_empty() {
            return Err(ClientError::InvalidPortal("host must not be empty".to_string()));
        }
        if host.contains(['/', '?', '#', '@']) {
            return Err(ClientError::InvalidPortal(format!(
                "host {host:?} must not carry a path, query, fragment or userinfo"
            )));
        }

        let raw = match port {
            Some(port) => format!("{scheme}://{host}:{port}"),
            None => format!("{scheme}://{host}"),
        };
        let base_url = Url::parse(&raw).map_err(|e| ClientError::InvalidPortal(format!("{raw}: {e}")))?;

        Ok(Self { base_url })
    }

    /// Build from a full URL such as `https://acme-admin.3scale.net`. Only the
    /// scheme, host and port are kept.
    pub fn parse(url: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(url).map_err(|e| ClientError::InvalidPortal(format!("{url}: {e}")))?;
        let host = parsed.host_str().unwrap_or_default();
        Self::new(parsed.scheme(), host, parsed.port())
    }

    pub fn scheme(&self) -> &str {
        self.base_url.scheme()
    }

    pub fn host(&self) -> &str {
        self.base_url.host_str().unwrap_or_default()
    }

    /// Explicit port, or the scheme's default.
    pub fn port(&self) -> Option<u16> {
        self.base_url.port_or_known_default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl fmt::Display for AdminPortal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_url)
    }
}

/// Access token attached to every outgoing request. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    inner: String,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self { inner: token.into() }
    }

    /// The token value, for placing on the wire.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential([REDACTED])")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Drop for Credential {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}
