use std::sync::Arc;

use terracache_core::JsonMap;

use crate::errors::EndpointError;
use crate::router::RouterAdapter;

pub mod discovery;
pub mod health;
pub mod static_endpoints;

/// A group of routes that mounts itself on a router at startup.
pub trait Controller: Send + Sync {
    fn register(self: Arc<Self>, router: &mut dyn RouterAdapter);
}

/// Anything able to advertise services through the discovery document.
///
/// Keys are service identifiers such as `providers.v1`; values are whatever
/// descriptor the service wants clients to see, usually a base URL.
pub trait EndpointProvider: Send + Sync {
    fn endpoints(&self) -> Result<JsonMap, EndpointError>;
}
