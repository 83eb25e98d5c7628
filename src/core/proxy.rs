//! Core proxy logic.
//!
//! `ProxyService` owns the request-independent pieces of the proxy: deriving
//! the browser-facing configuration document from a resolved address and
//! transforming an inbound `/api/**` request into the outbound request for
//! the backend's current location. This layer deliberately avoids I/O and
//! only manipulates in-memory data so it remains fast and easily testable in
//! isolation; resolution and the actual network hop live in the adapters.
use std::net::SocketAddr;

use axum::body::Body;
use http::uri::InvalidUri;
use hyper::{HeaderMap, Request, header};

use crate::core::{address::ServiceAddress, client_config::ClientConfig};

/// Hop-by-hop headers that must not survive the proxy hop (RFC 9110 §7.6.1).
const HOP_BY_HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Remove hop-by-hop headers, including any named by the Connection header.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let connection_listed: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .collect();

    for name in connection_listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP_HEADERS {
        headers.remove(name);
    }
}

/// Stateless request transformer shared by all handlers.
pub struct ProxyService {
    chat_path: String,
}

impl ProxyService {
    /// `chat_path` is the backend WebSocket endpoint disclosed in the
    /// configuration document (e.g. `/dragon`).
    pub fn new(chat_path: impl Into<String>) -> Self {
        Self {
            chat_path: chat_path.into(),
        }
    }

    /// Derive the browser-facing configuration document for a resolved address.
    pub fn client_config(&self, addr: &ServiceAddress) -> ClientConfig {
        ClientConfig::for_address(addr, &self.chat_path)
    }

    /// Rewrite an inbound request so it targets the resolved backend.
    ///
    /// The path and query are preserved verbatim; hop-by-hop headers and Host
    /// are dropped (the client adapter regenerates Host for the new hop), and
    /// forwarding headers identify the original caller.
    pub fn build_upstream_request(
        &self,
        mut req: Request<Body>,
        addr: &ServiceAddress,
        client_addr: Option<SocketAddr>,
    ) -> Result<Request<Body>, InvalidUri> {
        let path_and_query = req
            .uri()
            .path_and_query()
            .map_or("/", |pq| pq.as_str())
            .to_string();

        *req.uri_mut() = format!("{}{}", addr.http_base(), path_and_query).parse()?;

        let headers = req.headers_mut();
        strip_hop_by_hop(headers);
        headers.remove(header::HOST);

        if let Some(client_addr) = client_addr
            && let Ok(value) = client_addr.ip().to_string().parse()
        {
            headers.insert("X-Forwarded-For", value);
        }
        if let Ok(value) = "http".parse() {
            headers.insert("X-Forwarded-Proto", value);
        }

        Ok(req)
    }
}
