use async_trait::async_trait;

use crate::{
    core::address::ServiceAddress,
    ports::resolver::{ResolveResult, Resolver},
};

/// Resolver backed by a statically configured backend address.
///
/// Used when the backend's location is pinned by deployment (docker-compose,
/// a fixed dev port) and no registry is running. Resolution never fails; the
/// configured address is simply restated for every request.
pub struct FixedResolver {
    address: ServiceAddress,
}

impl FixedResolver {
    pub fn new(address: ServiceAddress) -> Self {
        Self { address }
    }
}

#[async_trait]
impl Resolver for FixedResolver {
    async fn resolve(&self) -> ResolveResult<ServiceAddress> {
        Ok(self.address.clone())
    }
}
