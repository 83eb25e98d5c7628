pub mod http_client;
pub mod http_handler;
pub mod resolvers;

/// Re-export commonly used types from adapters
pub use http_client::HttpClientAdapter;
pub use http_handler::{HttpHandler, router};
pub use resolvers::{FixedResolver, RegistryResolver};
