//! The configuration document disclosed to the browser.
use serde::{Deserialize, Serialize};

use crate::core::address::ServiceAddress;

/// Addresses the browser needs to talk to the backend directly.
///
/// Derived from a freshly resolved [`ServiceAddress`] on every request to the
/// config endpoint and never stored, so the browser always sees the backend's
/// current location. Field names are camelCase on the wire because the
/// consumer is browser-side JavaScript.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Base URL for REST calls, e.g. `http://localhost:5001`.
    pub http_base_url: String,
    /// Full WebSocket URL for the chat stream, e.g. `ws://localhost:5001/dragon`.
    pub ws_base_url: String,
}

impl ClientConfig {
    /// Build the document for a resolved address. `chat_path` is the
    /// backend's WebSocket endpoint path (leading slash included).
    pub fn for_address(addr: &ServiceAddress, chat_path: &str) -> Self {
        Self {
            http_base_url: addr.http_base(),
            ws_base_url: addr.ws_url(chat_path),
        }
    }
}
