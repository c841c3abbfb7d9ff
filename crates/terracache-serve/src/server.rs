use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::http::{Method, StatusCode};
use actix_web::web::{self, ServiceConfig};
use actix_web::{middleware, App, HttpRequest, HttpResponse, HttpServer, ResponseError};
use serde_json::json;
use terracache_core::Context;

use crate::controllers::Controller;
use crate::errors::{HandlerError, ServeError};
use crate::router::{Handler, JsonResponse, RequestContext, RouteTable, Verb};

pub const DEFAULT_BINDING_ADDRESS: &str = "localhost";
pub const DEFAULT_BINDING_PORT: &str = "5758";

const SERVER_WORKERS: usize = 4;

/// Mount every controller on a fresh route table.
pub fn build_route_table(controllers: Vec<Arc<dyn Controller>>) -> RouteTable {
    let mut table = RouteTable::new();
    for controller in controllers.into_iter() {
        controller.register(&mut table.router());
    }
    table
}

pub async fn start_server(
    network_binding: &str,
    controllers: Vec<Arc<dyn Controller>>,
    ctx: &Context,
) -> Result<ServerHandle, ServeError> {
    let routes = Arc::new(build_route_table(controllers));
    ctx.try_log(|logger| {
        info!(logger, "Starting server {} ({} routes)", network_binding, routes.len())
    });

    let moved_ctx = ctx.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .configure(configure_routes(routes.clone(), moved_ctx.clone()))
    })
    .workers(SERVER_WORKERS)
    .bind(network_binding)
    .map_err(|source| ServeError::Bind { binding: network_binding.to_string(), source })?
    .run();

    let handle = server.handle();
    tokio::spawn(server);

    Ok(handle)
}

/// Expose a route table on an actix application.
pub fn configure_routes(routes: Arc<RouteTable>, ctx: Context) -> impl Fn(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        for route in routes.routes().iter() {
            let handler = route.handler.clone();
            let verb = route.verb;
            let ctx = ctx.clone();
            cfg.route(
                &route.path,
                web::method(actix_method(verb)).to(move |req: HttpRequest| {
                    dispatch(handler.clone(), verb, req, ctx.clone())
                }),
            );
        }
    }
}

async fn dispatch(
    handler: Handler,
    verb: Verb,
    req: HttpRequest,
    ctx: Context,
) -> Result<HttpResponse, HandlerError> {
    let path = req.path().to_string();
    let mut request = RequestContext::new(verb, path.clone());

    // handlers may block on their providers, keep them off the I/O workers
    let outcome = web::block(move || -> Result<JsonResponse, HandlerError> {
        handler(&mut request)?;
        request.into_response()
    })
    .await;

    let response = match outcome {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            ctx.try_log(|logger| error!(logger, "{} {} failed: {}", verb, path, e));
            return Err(e);
        }
        Err(_) => {
            ctx.try_log(|logger| error!(logger, "{} {} was dropped by the worker pool", verb, path));
            return Err(HandlerError::WorkerUnavailable);
        }
    };

    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok(HttpResponse::build(status).json(response.body))
}

fn actix_method(verb: Verb) -> Method {
    match verb {
        Verb::Get => Method::GET,
        Verb::Head => Method::HEAD,
        Verb::Post => Method::POST,
        Verb::Put => Method::PUT,
        Verb::Patch => Method::PATCH,
        Verb::Delete => Method::DELETE,
        Verb::Options => Method::OPTIONS,
    }
}

impl ResponseError for HandlerError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
