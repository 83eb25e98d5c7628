//! Portico - a discovery-backed proxy fronting a browser chat client.
//!
//! Portico sits between a browser and a backend chat server whose network
//! location is not stable across the proxy's lifetime. It implements a
//! **hexagonal architecture**: business logic lives in `core`, the seams are
//! **ports** (traits), and the I/O lives in **adapters**.
//!
//! # Features
//! - A configuration endpoint (`GET /api/config`) that resolves the backend's
//!   current address per request and discloses `{httpBaseUrl, wsBaseUrl}` so
//!   the browser can open its WebSocket directly against the backend
//! - Transparent forwarding of all other `/api/**` traffic to the resolved
//!   backend, preserving method, path, query, headers and body
//! - Pluggable address resolution: a fixed address or an external HTTP
//!   service registry with a short bounded TTL cache
//! - Gateway-style error mapping that lets the browser distinguish "no
//!   backend found", "backend not responding" and "backend errored"
//! - Structured tracing via `tracing` and graceful shutdown
//!
//! # Quick Example
//! ```no_run
//! use std::sync::Arc;
//!
//! use portico::{
//!     adapters::{FixedResolver, HttpClientAdapter, HttpHandler, router},
//!     core::{ProxyService, Scheme, ServiceAddress},
//! };
//!
//! # #[tokio::main] async fn main() -> eyre::Result<()> {
//! let resolver = Arc::new(FixedResolver::new(ServiceAddress::new(
//!     Scheme::Http,
//!     "localhost",
//!     5001,
//! )));
//! let handler = Arc::new(HttpHandler::new(
//!     Arc::new(ProxyService::new("/dragon")),
//!     resolver,
//!     Arc::new(HttpClientAdapter::new(30)?),
//! ));
//! let app = router(handler);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(()) }
//! ```
//!
//! # WebSocket handling
//! Portico never terminates or relays the chat WebSocket. Proxying a
//! long-lived bidirectional stream adds buffering, backpressure and
//! half-close concerns the browser avoids entirely by connecting straight to
//! the backend once it knows the correct address, so the proxy's involvement
//! stops at accurate address disclosure.
//!
//! # Error Handling
//! All fallible APIs return `eyre::Result<T>` or a domain specific error type
//! (`ResolveError`, `HttpClientError`). Backend error statuses are never
//! rewritten; they pass through the forwarder verbatim.
// Re-export public modules with explicit visibility controls
pub mod config;
pub mod ports;
pub mod tracing_setup;
pub mod utils;

// These modules are implementation details and should not be directly used by users
pub mod adapters;
pub mod core;

// Re-export the specific types needed by the binary crate
pub use crate::{
    adapters::{FixedResolver, HttpClientAdapter, HttpHandler, RegistryResolver, router},
    core::{ClientConfig, ProxyService, Scheme, ServiceAddress},
    ports::{http_client::HttpClient, resolver::Resolver},
    utils::GracefulShutdown,
};
