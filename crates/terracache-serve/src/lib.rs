#[macro_use]
extern crate hiro_system_kit;

pub mod controllers;
pub mod errors;
pub mod router;
pub mod server;

pub use controllers::{
    discovery::DiscoveryController, health::HealthController, static_endpoints::StaticEndpoints,
    Controller, EndpointProvider,
};
pub use errors::{EndpointError, HandlerError, ServeError};
pub use router::{RequestContext, RouteTable, Router, RouterAdapter, Verb};
pub use server::{configure_routes, start_server, DEFAULT_BINDING_ADDRESS, DEFAULT_BINDING_PORT};
