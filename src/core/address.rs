//! Resolved backend address types.
//!
//! A `ServiceAddress` is what the resolver hands back for "where is the
//! backend right now". It is a per-request hint, not a stable location: the
//! backend may move between two resolutions (redeploy, registry churn), so
//! nothing in this crate caches one beyond the request that obtained it.
use std::fmt;

use serde::{Deserialize, Serialize};

/// URL scheme of a resolved backend.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// The scheme as it appears in an HTTP URL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    /// The matching WebSocket scheme (`ws` for `http`, `wss` for `https`).
    ///
    /// This mapping is the only place the ws scheme is produced, so a
    /// mixed-scheme configuration document cannot be constructed.
    pub fn ws_counterpart(&self) -> &'static str {
        match self {
            Scheme::Http => "ws",
            Scheme::Https => "wss",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network location of the backend as reported by a resolver.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ServiceAddress {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
}

impl ServiceAddress {
    pub fn new(scheme: Scheme, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme,
            host: host.into(),
            port,
        }
    }

    /// Base URL for HTTP requests against this backend, without a trailing slash.
    pub fn http_base(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// WebSocket URL for this backend with `path` appended.
    pub fn ws_url(&self, path: &str) -> String {
        format!(
            "{}://{}:{}{}",
            self.scheme.ws_counterpart(),
            self.host,
            self.port,
            path
        )
    }
}

impl fmt::Display for ServiceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.http_base())
    }
}
