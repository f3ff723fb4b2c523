// src/core/key.rs

//! The request coordinates a cache entry is derived from.

use crate::core::errors::PeridotError;
use url::Url;

/// The scheme of the request that produced a page. Secure and plain
/// variants of the same host/path never share a storage location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// Directory-name marker separating HTTPS-origin entries from
    /// plain-scheme entries for the same host.
    pub fn dir_prefix(&self) -> &'static str {
        match self {
            Scheme::Http => "",
            Scheme::Https => "https-",
        }
    }
}

/// Identifies one cached URL variant: scheme, host, and URL path.
///
/// The serving layer passes the coordinates of the request it is currently
/// handling; callers that mean a specific historical URL build the key from
/// that URL explicitly (see [`CacheKey::from_url`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub scheme: Scheme,
    pub host: String,
    pub path: String,
}

impl CacheKey {
    pub fn new(scheme: Scheme, host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            scheme,
            host: host.into(),
            path: path.into(),
        }
    }

    /// Builds a key from a full absolute URL, e.g. a stored permalink.
    pub fn from_url(url: &str) -> Result<Self, PeridotError> {
        let parsed = Url::parse(url)?;

        let scheme = match parsed.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => {
                return Err(PeridotError::InvalidPath(format!(
                    "unsupported URL scheme '{other}'"
                )));
            }
        };

        let host = parsed
            .host_str()
            .ok_or_else(|| PeridotError::InvalidPath(format!("URL '{url}' has no host")))?;

        Ok(Self::new(scheme, host, parsed.path()))
    }
}
