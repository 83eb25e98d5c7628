//! Configuration data structures for Portico.
//!
//! These types map directly to TOML (also JSON / YAML) configuration files. They are
//! intentionally serde-friendly and include defaults so that minimal configs remain concise.
use serde::{Deserialize, Serialize};

use crate::core::address::Scheme;

/// Default registry cache TTL in milliseconds
fn default_registry_ttl_ms() -> u64 {
    2_000
}

/// Default registry request timeout in seconds
fn default_registry_timeout_secs() -> u64 {
    5
}

/// Outbound (proxy -> backend) request settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Bound on a single forwarded request, in seconds
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// How the proxy discovers the backend's current address
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolverConfig {
    /// Statically configured backend location
    Fixed { scheme: Scheme, host: String, port: u16 },
    /// HTTP service registry queried per request (with a short TTL cache)
    Registry {
        /// Base URL of the registry, e.g. "http://127.0.0.1:8500"
        endpoint: String,
        /// Logical service name the backend registers under
        service: String,
        /// Cache TTL in milliseconds; 0 disables caching
        #[serde(default = "default_registry_ttl_ms")]
        ttl_ms: u64,
        /// Bound on a single registry query, in seconds
        #[serde(default = "default_registry_timeout_secs")]
        timeout_secs: u64,
    },
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig::Fixed {
            scheme: Scheme::Http,
            host: "localhost".to_string(),
            port: 5001,
        }
    }
}

/// Top-level proxy configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ProxyConfig {
    /// The address the proxy listens on
    pub listen_addr: String,
    /// Backend WebSocket endpoint path disclosed to the browser
    pub chat_path: String,
    pub upstream: UpstreamConfig,
    pub resolver: ResolverConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            chat_path: "/dragon".to_string(),
            upstream: UpstreamConfig::default(),
            resolver: ResolverConfig::default(),
        }
    }
}
