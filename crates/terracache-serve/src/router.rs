//! Framework-neutral routing surface.
//!
//! Controllers mount themselves through [`RouterAdapter`] and answer requests
//! through [`RequestContext`]; neither type knows about the HTTP server that
//! eventually serves the collected [`RouteTable`] (see [`crate::server`]).

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::errors::HandlerError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Head => "HEAD",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
            Verb::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct JsonResponse {
    pub status: u16,
    pub body: JsonValue,
}

/// Per-request state handed to a [`Handler`].
#[derive(Debug)]
pub struct RequestContext {
    verb: Verb,
    path: String,
    response: Option<JsonResponse>,
}

impl RequestContext {
    pub fn new(verb: Verb, path: impl Into<String>) -> Self {
        RequestContext { verb, path: path.into(), response: None }
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Write `body` as the JSON response with the given status code.
    pub fn json<T: Serialize + ?Sized>(&mut self, status: u16, body: &T) -> Result<(), HandlerError> {
        let body = serde_json::to_value(body).map_err(HandlerError::Serialization)?;
        self.response = Some(JsonResponse { status, body });
        Ok(())
    }

    pub fn into_response(self) -> Result<JsonResponse, HandlerError> {
        let RequestContext { verb, path, response } = self;
        response.ok_or_else(|| HandlerError::MissingResponse(format!("{} {}", verb, path)))
    }
}

pub type Handler = Arc<dyn Fn(&mut RequestContext) -> Result<(), HandlerError> + Send + Sync>;

/// Minimal routing capability controllers depend on.
pub trait RouterAdapter {
    /// Path prefix every route registered through this router receives.
    fn prefix(&self) -> &str;

    /// Open a sub-router whose routes live under `prefix`.
    fn group(&mut self, prefix: &str) -> Box<dyn RouterAdapter + '_>;

    fn register(&mut self, verb: Verb, path: &str, handler: Handler);

    fn get(&mut self, path: &str, handler: Handler) {
        self.register(Verb::Get, path, handler)
    }
}

#[derive(Clone)]
pub struct Route {
    pub verb: Verb,
    pub path: String,
    pub handler: Handler,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route").field("verb", &self.verb).field("path", &self.path).finish()
    }
}

#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        RouteTable::default()
    }

    /// Root router writing into this table.
    pub fn router(&mut self) -> Router<'_> {
        Router { prefix: String::new(), table: self }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn find(&self, verb: Verb, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.verb == verb && route.path == path)
    }

    /// Registering the same verb and path twice keeps the latest handler.
    fn insert(&mut self, route: Route) {
        match self.routes.iter_mut().find(|r| r.verb == route.verb && r.path == route.path) {
            Some(existing) => *existing = route,
            None => self.routes.push(route),
        }
    }
}

pub struct Router<'a> {
    prefix: String,
    table: &'a mut RouteTable,
}

impl RouterAdapter for Router<'_> {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn group(&mut self, prefix: &str) -> Box<dyn RouterAdapter + '_> {
        Box::new(Router { prefix: join_paths(&self.prefix, prefix), table: &mut *self.table })
    }

    fn register(&mut self, verb: Verb, path: &str, handler: Handler) {
        let path = join_paths(&self.prefix, path);
        self.table.insert(Route { verb, path, handler });
    }
}

fn join_paths(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    match (prefix.is_empty(), path.is_empty()) {
        (true, true) => "/".to_string(),
        (_, true) => prefix.to_string(),
        (true, false) => format!("/{}", path),
        (false, false) => format!("{}/{}", prefix, path),
    }
}
