//! Base domain derivation from the configured application URL.

use std::fmt;

use thiserror::Error;
use url::Url;

/// Error type for base domain parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("application URL is empty")]
    Empty,
    #[error("application URL `{url}` is invalid: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("application URL `{0}` has no host")]
    MissingHost(String),
    #[error("unsupported scheme `{0}` (expected http or https)")]
    UnsupportedScheme(String),
}

/// The bare production domain the platform is served from.
///
/// `https://www.qrmenu.app` and `qrmenu.app` both parse to the same
/// `BaseDomain { scheme: "https", host: "qrmenu.app", port: None }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseDomain {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl BaseDomain {
    /// Parse an application URL. A missing scheme defaults to `https`.
    pub fn parse(app_url: &str) -> Result<Self, DomainError> {
        let trimmed = app_url.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Empty);
        }

        let candidate = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        let url = Url::parse(&candidate).map_err(|e| DomainError::InvalidUrl {
            url: trimmed.to_string(),
            reason: e.to_string(),
        })?;

        let scheme = match url.scheme() {
            "http" | "https" => url.scheme().to_string(),
            other => return Err(DomainError::UnsupportedScheme(other.to_string())),
        };

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| DomainError::MissingHost(trimmed.to_string()))?
            .to_ascii_lowercase();
        let host = host.trim_end_matches('.');
        let host = host.strip_prefix("www.").unwrap_or(host).to_string();

        Ok(Self {
            scheme,
            host,
            port: url.port(),
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Number of DNS labels in the bare host (`qrmenu.app` = 2).
    pub fn label_count(&self) -> usize {
        self.host.split('.').count()
    }

    /// Host plus explicit port, as it appears in links.
    pub fn authority(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }
}

impl fmt::Display for BaseDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.authority())
    }
}
