use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::{
    core::address::{Scheme, ServiceAddress},
    ports::resolver::{ResolveError, ResolveResult, Resolver},
};

/// One backend registration as reported by the service registry.
#[derive(Debug, Deserialize, Clone)]
struct Registration {
    scheme: Scheme,
    host: String,
    port: u16,
    registered_at: DateTime<Utc>,
}

/// Resolver that queries an external HTTP service registry.
///
/// Each resolution issues `GET {endpoint}/v1/services/{service}` and expects
/// a JSON array of registrations. When several instances are registered the
/// most recently registered one wins, on the assumption that the newest
/// registration reflects the latest deploy.
///
/// A short TTL cache bounds registry traffic under request bursts without
/// letting answers go stale across a redeploy; a TTL of zero disables
/// caching entirely. The cache is safe for concurrent reads and refresh.
pub struct RegistryResolver {
    endpoint: String,
    service: String,
    client: Client,
    timeout_secs: u64,
    ttl: Duration,
    cached: RwLock<Option<(Instant, ServiceAddress)>>,
}

impl RegistryResolver {
    /// `endpoint` is the registry's base URL (no trailing slash needed),
    /// `service` the logical name the backend registers under.
    pub fn new(endpoint: String, service: String, timeout_secs: u64, ttl: Duration) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            service,
            client,
            timeout_secs,
            ttl,
            cached: RwLock::new(None),
        }
    }

    async fn fetch_registrations(&self) -> ResolveResult<Vec<Registration>> {
        let url = format!("{}/v1/services/{}", self.endpoint, self.service);

        let resp = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                ResolveError::Timeout(self.timeout_secs)
            } else {
                ResolveError::Registry(format!("Request to {url} failed: {e}"))
            }
        })?;

        if !resp.status().is_success() {
            return Err(ResolveError::Registry(format!(
                "Registry returned status {} for {url}",
                resp.status()
            )));
        }

        resp.json::<Vec<Registration>>()
            .await
            .map_err(|e| ResolveError::Registry(format!("Invalid registry payload: {e}")))
    }

    /// Most-recently-registered instance wins.
    fn select(&self, registrations: Vec<Registration>) -> ResolveResult<ServiceAddress> {
        registrations
            .into_iter()
            .max_by_key(|r| r.registered_at)
            .map(|r| ServiceAddress::new(r.scheme, r.host, r.port))
            .ok_or_else(|| ResolveError::NoInstance(self.service.clone()))
    }
}

#[async_trait]
impl Resolver for RegistryResolver {
    async fn resolve(&self) -> ResolveResult<ServiceAddress> {
        if !self.ttl.is_zero()
            && let Some((fetched_at, address)) = self.cached.read().await.as_ref()
            && fetched_at.elapsed() < self.ttl
        {
            tracing::debug!(service = %self.service, %address, "Resolved from cache");
            return Ok(address.clone());
        }

        let registrations = self.fetch_registrations().await?;
        let address = self.select(registrations)?;
        tracing::debug!(service = %self.service, %address, "Resolved from registry");

        if !self.ttl.is_zero() {
            *self.cached.write().await = Some((Instant::now(), address.clone()));
        }

        Ok(address)
    }
}
