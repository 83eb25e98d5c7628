// Integration tests for /api/** forwarding against a live mock backend
#[cfg(test)]
mod tests {
    use std::{
        net::SocketAddr,
        sync::Arc,
        time::{Duration, Instant},
    };

    use axum::{
        Json, Router,
        body::Body,
        extract::{Path, Request},
        http::{HeaderMap, StatusCode, header},
        routing::{any, get},
    };
    use http_body_util::BodyExt;
    use portico::{
        adapters::{FixedResolver, HttpClientAdapter, HttpHandler, router},
        core::{ProxyService, Scheme, ServiceAddress},
    };
    use serde_json::{Value, json};
    use tokio::net::TcpListener;
    use tower::ServiceExt;

    async fn projects() -> ([(&'static str, &'static str); 1], Json<Value>) {
        (
            [("x-backend-id", "mock-1")],
            Json(json!([{"id": 1, "name": "alpha"}, {"id": 2, "name": "beta"}])),
        )
    }

    async fn project_by_id(Path(id): Path<u64>) -> (StatusCode, String) {
        (StatusCode::NOT_FOUND, format!("no project with id {id}"))
    }

    async fn echo(req: Request) -> Json<Value> {
        let (parts, body) = req.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        Json(json!({
            "method": parts.method.as_str(),
            "query": parts.uri.query(),
            "body": String::from_utf8_lossy(&bytes),
        }))
    }

    async fn seen_headers(headers: HeaderMap) -> Json<Value> {
        Json(json!({
            "connection_forwarded": headers.contains_key(header::CONNECTION),
            "keep_alive_forwarded": headers.contains_key("keep-alive"),
            "request_id": headers
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            "forwarded_for": headers
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok()),
        }))
    }

    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_secs(5)).await;
        "late"
    }

    /// Spawn a mock backend standing in for the chat server's REST surface.
    async fn spawn_backend() -> SocketAddr {
        let app = Router::new()
            .route("/api/projects", get(projects))
            .route("/api/projects/{id}", get(project_by_id))
            .route("/api/echo", any(echo))
            .route("/api/headers", get(seen_headers))
            .route("/api/slow", get(slow));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn proxy_for(backend: SocketAddr, timeout_secs: u64) -> axum::Router {
        let resolver = Arc::new(FixedResolver::new(ServiceAddress::new(
            Scheme::Http,
            backend.ip().to_string(),
            backend.port(),
        )));
        let handler = Arc::new(HttpHandler::new(
            Arc::new(ProxyService::new("/dragon")),
            resolver,
            Arc::new(HttpClientAdapter::new(timeout_secs).unwrap()),
        ));
        router(handler)
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_forwards_status_headers_and_body() {
        let backend = spawn_backend().await;
        let app = proxy_for(backend, 30);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/projects")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("x-backend-id").unwrap(), "mock-1");

        let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json[0]["name"], "alpha");
        assert_eq!(json[1]["name"], "beta");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_backend_error_status_passes_through_verbatim() {
        let backend = spawn_backend().await;
        let app = proxy_for(backend, 30);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/projects/999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = String::from_utf8(body_bytes(response).await).unwrap();
        assert_eq!(body, "no project with id 999");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_all_methods_and_bodies_are_forwarded() {
        let backend = spawn_backend().await;
        let app = proxy_for(backend, 30);

        for method in ["POST", "PUT", "PATCH", "DELETE"] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri("/api/echo")
                        .header(header::CONTENT_TYPE, "text/plain")
                        .body(Body::from(format!("payload-for-{method}")))
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
            assert_eq!(json["method"], method);
            assert_eq!(json["body"], format!("payload-for-{method}"));
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_query_string_is_preserved() {
        let backend = spawn_backend().await;
        let app = proxy_for(backend, 30);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/echo?limit=10&cursor=abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["query"], "limit=10&cursor=abc");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_hop_by_hop_headers_do_not_cross_the_proxy() {
        let backend = spawn_backend().await;
        let app = proxy_for(backend, 30);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/headers")
                    .header(header::CONNECTION, "keep-alive")
                    .header("keep-alive", "timeout=5")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["connection_forwarded"], false);
        assert_eq!(json["keep_alive_forwarded"], false);
        // End-to-end headers survive the hop.
        assert_eq!(json["request_id"], "req-42");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_slow_backend_times_out_with_504_within_bound() {
        let backend = spawn_backend().await;
        let app = proxy_for(backend, 1);

        let started = Instant::now();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/slow")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let elapsed = started.elapsed();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["error"], "server_timeout");

        // Timeout plus small overhead, never the backend's full delay.
        assert!(
            elapsed < Duration::from_secs(3),
            "took {elapsed:?}, expected ~1s"
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_forwarder_resolves_independently_per_request() {
        // Two proxies over the same handler shape but different backends:
        // each request goes to whatever its own resolution returned.
        let backend_a = spawn_backend().await;
        let backend_b = spawn_backend().await;

        let app_a = proxy_for(backend_a, 30);
        let app_b = proxy_for(backend_b, 30);

        for app in [app_a, app_b] {
            let response = app
                .oneshot(
                    Request::builder()
                        .uri("/api/projects")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }
}
