use async_trait::async_trait;
use axum::body::Body as AxumBody;
use hyper::{Request, Response};
use thiserror::Error;

/// Custom error type for HTTP client operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpClientError {
    /// Error when connection to the backend fails
    #[error("Connection error: {0}")]
    Connect(String),

    /// Error when the outbound request exceeds its bound
    #[error("Timeout error after {0} seconds")]
    Timeout(u64),

    /// Error when the request cannot be sent as constructed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type alias for HTTP client operations
pub type HttpClientResult<T> = Result<T, HttpClientError>;

/// HttpClient defines the port (interface) for the single outbound hop to
/// the backend.
///
/// A backend response with an error status is NOT an error here: the
/// forwarder passes upstream statuses through verbatim, so only transport
/// failures (connect, timeout) surface as `Err`.
#[async_trait]
pub trait HttpClient: Send + Sync + 'static {
    /// Send an HTTP request to the backend and stream back its response.
    async fn send_request(&self, req: Request<AxumBody>) -> HttpClientResult<Response<AxumBody>>;
}
