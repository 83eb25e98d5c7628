use async_trait::async_trait;
use thiserror::Error;

use crate::core::address::ServiceAddress;

/// Custom error type for backend address resolution
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ResolveError {
    /// The discovery mechanism answered but no backend instance is registered
    #[error("No backend instance registered for service '{0}'")]
    NoInstance(String),

    /// The discovery mechanism itself was unreachable or returned garbage
    #[error("Service registry error: {0}")]
    Registry(String),

    /// The resolution call exceeded its bound
    #[error("Resolution timed out after {0} seconds")]
    Timeout(u64),
}

/// Result type alias for resolution operations
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Resolver defines the port (interface) for discovering the backend's
/// current network address.
///
/// Implementations may cache internally for a short, bounded TTL but the
/// contract is that callers re-resolve on every request: the backend's
/// location is not assumed stable across the proxy's lifetime, and a stale
/// answer is worse than a failed one. Implementations must be safe for
/// concurrent calls.
#[async_trait]
pub trait Resolver: Send + Sync + 'static {
    /// Resolve the backend's current address.
    ///
    /// # Returns
    /// The address to use for this request only, or a [`ResolveError`] when
    /// no backend is currently reachable. Never a default or previously-seen
    /// address presented as current.
    async fn resolve(&self) -> ResolveResult<ServiceAddress>;
}
