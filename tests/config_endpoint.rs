// Integration tests for the browser-facing configuration endpoint
#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use axum::body::Body;
    use http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use portico::{
        adapters::{FixedResolver, HttpClientAdapter, HttpHandler, router},
        core::{ProxyService, Scheme, ServiceAddress},
        ports::resolver::{ResolveError, ResolveResult, Resolver},
    };
    use tower::ServiceExt;

    struct FailingResolver;

    #[async_trait]
    impl Resolver for FailingResolver {
        async fn resolve(&self) -> ResolveResult<ServiceAddress> {
            Err(ResolveError::NoInstance("chat-server".to_string()))
        }
    }

    /// Alternates between two backends on every call, standing in for a
    /// registry mid-redeploy.
    struct FlippingResolver {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Resolver for FlippingResolver {
        async fn resolve(&self) -> ResolveResult<ServiceAddress> {
            let call = self.calls.fetch_add(1, Ordering::Relaxed);
            if call % 2 == 0 {
                Ok(ServiceAddress::new(Scheme::Http, "backend-a", 5001))
            } else {
                Ok(ServiceAddress::new(Scheme::Https, "backend-b", 8443))
            }
        }
    }

    fn proxy_router(resolver: Arc<dyn Resolver>) -> axum::Router {
        let handler = Arc::new(HttpHandler::new(
            Arc::new(ProxyService::new("/dragon")),
            resolver,
            Arc::new(HttpClientAdapter::new(5).unwrap()),
        ));
        router(handler)
    }

    async fn get_config(app: axum::Router) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/config")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_config_discloses_resolved_backend() {
        let app = proxy_router(Arc::new(FixedResolver::new(ServiceAddress::new(
            Scheme::Http,
            "localhost",
            5001,
        ))));

        let (status, json) = get_config(app).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!({
                "httpBaseUrl": "http://localhost:5001",
                "wsBaseUrl": "ws://localhost:5001/dragon",
            })
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_https_backend_yields_wss_url() {
        let app = proxy_router(Arc::new(FixedResolver::new(ServiceAddress::new(
            Scheme::Https,
            "chat.example.com",
            8443,
        ))));

        let (status, json) = get_config(app).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["httpBaseUrl"], "https://chat.example.com:8443");
        assert_eq!(json["wsBaseUrl"], "wss://chat.example.com:8443/dragon");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_resolution_failure_returns_503_without_address() {
        let app = proxy_router(Arc::new(FailingResolver));

        let (status, json) = get_config(app).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json, serde_json::json!({"error": "server_unavailable"}));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_calls_each_get_consistent_document() {
        let app = proxy_router(Arc::new(FlippingResolver {
            calls: AtomicUsize::new(0),
        }));

        let (first, second) = tokio::join!(get_config(app.clone()), get_config(app));

        for (status, json) in [first, second] {
            assert_eq!(status, StatusCode::OK);
            let http_base = json["httpBaseUrl"].as_str().unwrap();
            let ws_base = json["wsBaseUrl"].as_str().unwrap();

            // Never a mixed-scheme document, whichever backend answered.
            if http_base.starts_with("https://") {
                assert!(ws_base.starts_with("wss://"), "mixed schemes: {json}");
            } else {
                assert!(http_base.starts_with("http://"));
                assert!(ws_base.starts_with("ws://"), "mixed schemes: {json}");
            }
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_config_is_recomputed_per_request() {
        let app = proxy_router(Arc::new(FlippingResolver {
            calls: AtomicUsize::new(0),
        }));

        let (_, first) = get_config(app.clone()).await;
        let (_, second) = get_config(app).await;

        // The resolver flipped between the two calls, and the endpoint
        // re-resolved rather than serving a remembered document.
        assert_ne!(first, second);
    }
}
