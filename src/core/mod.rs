pub mod address;
pub mod client_config;
pub mod proxy;

pub use address::{Scheme, ServiceAddress};
pub use client_config::ClientConfig;
pub use proxy::ProxyService;
