use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    body::Body as AxumBody,
    extract::{ConnectInfo, Request, State},
    http::{StatusCode, header},
    response::Response,
    routing::{any, get},
};
use tower_http::trace::TraceLayer;

use crate::{
    core::ProxyService,
    ports::{
        http_client::{HttpClient, HttpClientError},
        resolver::Resolver,
    },
};

/// HTTP handler for the Portico proxy.
///
/// Serves the browser-facing surface: the configuration endpoint that
/// discloses the backend's current address, the `/api/**` forwarder, and a
/// health probe. Each request resolves the backend address independently;
/// nothing here assumes two requests see the same backend.
pub struct HttpHandler {
    proxy: Arc<ProxyService>,
    resolver: Arc<dyn Resolver>,
    http_client: Arc<dyn HttpClient>,
}

impl HttpHandler {
    pub fn new(
        proxy: Arc<ProxyService>,
        resolver: Arc<dyn Resolver>,
        http_client: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            proxy,
            resolver,
            http_client,
        }
    }

    /// Handle `GET /api/config`.
    ///
    /// Resolves the backend per request and derives a fresh configuration
    /// document. On resolution failure the browser gets a distinguishable
    /// 503 rather than a stale or default address.
    pub async fn handle_client_config(&self) -> Response<AxumBody> {
        match self.resolver.resolve().await {
            Ok(address) => {
                let config = self.proxy.client_config(&address);
                tracing::debug!(backend = %address, "Disclosing backend address");
                json_response(StatusCode::OK, &serde_json::json!(config))
            }
            Err(e) => {
                tracing::warn!("Backend resolution failed: {}", e);
                error_response(StatusCode::SERVICE_UNAVAILABLE, "server_unavailable")
            }
        }
    }

    /// Handle `ANY /api/**`: resolve, rewrite, forward, pass the backend's
    /// response through verbatim (minus hop-by-hop headers).
    pub async fn handle_forward(&self, req: Request<AxumBody>) -> Response<AxumBody> {
        let client_addr = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        let address = match self.resolver.resolve().await {
            Ok(address) => address,
            Err(e) => {
                tracing::warn!("Backend resolution failed for forwarded request: {}", e);
                return error_response(StatusCode::BAD_GATEWAY, "server_unavailable");
            }
        };

        let outbound = match self.proxy.build_upstream_request(req, &address, client_addr) {
            Ok(outbound) => outbound,
            Err(e) => {
                tracing::error!("Failed to build upstream request for {}: {}", address, e);
                return error_response(StatusCode::BAD_GATEWAY, "server_unreachable");
            }
        };

        match self.http_client.send_request(outbound).await {
            Ok(mut response) => {
                // Backend statuses, error or not, reach the caller untouched.
                crate::core::proxy::strip_hop_by_hop(response.headers_mut());
                response
            }
            Err(HttpClientError::Timeout(secs)) => {
                tracing::warn!("Backend did not respond within {}s", secs);
                error_response(StatusCode::GATEWAY_TIMEOUT, "server_timeout")
            }
            Err(e) => {
                tracing::error!("Backend request failed: {}", e);
                error_response(StatusCode::BAD_GATEWAY, "server_unreachable")
            }
        }
    }

    /// Handle `GET /health`: proxy liveness plus current resolver state.
    pub async fn handle_health(&self) -> Response<AxumBody> {
        let (status, backend) = match self.resolver.resolve().await {
            Ok(address) => (StatusCode::OK, Some(address.http_base())),
            Err(_) => (StatusCode::SERVICE_UNAVAILABLE, None),
        };

        let health_data = serde_json::json!({
            "status": if status == StatusCode::OK { "healthy" } else { "unhealthy" },
            "backend": backend,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        json_response(status, &health_data)
    }
}

fn json_response(status: StatusCode, body: &serde_json::Value) -> Response<AxumBody> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(AxumBody::from(body.to_string()))
        .unwrap_or_else(|_| Response::new(AxumBody::empty()))
}

fn error_response(status: StatusCode, code: &'static str) -> Response<AxumBody> {
    json_response(status, &serde_json::json!({ "error": code }))
}

/// Build the proxy's router around a handler.
///
/// `/api/config` wins over the wildcard because static segments take
/// precedence in axum's route matching, so the config endpoint is never
/// forwarded.
pub fn router(handler: Arc<HttpHandler>) -> Router {
    async fn client_config(State(handler): State<Arc<HttpHandler>>) -> Response<AxumBody> {
        handler.handle_client_config().await
    }

    async fn forward(
        State(handler): State<Arc<HttpHandler>>,
        req: Request<AxumBody>,
    ) -> Response<AxumBody> {
        handler.handle_forward(req).await
    }

    async fn health(State(handler): State<Arc<HttpHandler>>) -> Response<AxumBody> {
        handler.handle_health().await
    }

    Router::new()
        .route("/health", get(health))
        .route("/api/config", get(client_config))
        .route("/api/{*path}", any(forward))
        .layer(TraceLayer::new_for_http())
        .with_state(handler)
}
