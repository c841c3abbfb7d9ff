use std::sync::Arc;

use terracache_core::JsonMap;

use crate::errors::{EndpointError, HandlerError};
use crate::router::{RequestContext, RouterAdapter};

use super::{Controller, EndpointProvider};

pub const DISCOVERY_PATH: &str = "/.well-known";
pub const TERRAFORM_DISCOVERY_DOCUMENT: &str = "/terraform.json";

/// Serves the remote service discovery document.
///
/// Providers are consulted in registration order on every request, so when two
/// of them advertise the same service the one registered last wins.
#[derive(Clone, Default)]
pub struct DiscoveryController {
    endpoint_providers: Vec<Arc<dyn EndpointProvider>>,
}

impl DiscoveryController {
    pub fn new(endpoint_providers: Vec<Arc<dyn EndpointProvider>>) -> Self {
        DiscoveryController { endpoint_providers }
    }

    pub fn with_provider(mut self, provider: Arc<dyn EndpointProvider>) -> Self {
        self.endpoint_providers.push(provider);
        self
    }

    pub fn providers_count(&self) -> usize {
        self.endpoint_providers.len()
    }

    pub fn collect_endpoints(&self) -> Result<JsonMap, EndpointError> {
        let mut endpoints = JsonMap::new();
        for provider in self.endpoint_providers.iter() {
            endpoints.extend(provider.endpoints()?);
        }
        Ok(endpoints)
    }

    fn terraform_action(&self, ctx: &mut RequestContext) -> Result<(), HandlerError> {
        let endpoints = self.collect_endpoints()?;
        ctx.json(200, &endpoints)
    }
}

impl Controller for DiscoveryController {
    fn register(self: Arc<Self>, router: &mut dyn RouterAdapter) {
        let mut group = router.group(DISCOVERY_PATH);
        group.get(
            TERRAFORM_DISCOVERY_DOCUMENT,
            Arc::new(move |ctx: &mut RequestContext| self.terraform_action(ctx)),
        );
    }
}
