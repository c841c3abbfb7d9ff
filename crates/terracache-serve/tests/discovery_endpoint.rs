use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use actix_web::http::{header, StatusCode};
use actix_web::{test, App};
use serde_json::{json, Value as JsonValue};
use terracache_core::{Context, JsonMap};
use terracache_serve::server::build_route_table;
use terracache_serve::{
    configure_routes, start_server, Controller, DiscoveryController, EndpointError,
    EndpointProvider, HealthController, ServeError, StaticEndpoints,
};

const DISCOVERY_URI: &str = "/.well-known/terraform.json";

fn static_provider(value: JsonValue) -> Arc<dyn EndpointProvider> {
    let JsonValue::Object(map) = value else { panic!("expected a JSON object") };
    Arc::new(StaticEndpoints::new(map))
}

/// Advertises a generation counter that moves on every call.
#[derive(Default)]
struct GenerationProvider {
    generation: AtomicU64,
}

impl EndpointProvider for GenerationProvider {
    fn endpoints(&self) -> Result<JsonMap, EndpointError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst);
        let mut endpoints = JsonMap::new();
        endpoints.insert("generation".into(), json!(generation));
        Ok(endpoints)
    }
}

struct UnavailableProvider;

impl EndpointProvider for UnavailableProvider {
    fn endpoints(&self) -> Result<JsonMap, EndpointError> {
        Err(EndpointError::new("module registry is still warming up"))
    }
}

fn controllers(providers: Vec<Arc<dyn EndpointProvider>>) -> Vec<Arc<dyn Controller>> {
    vec![Arc::new(HealthController), Arc::new(DiscoveryController::new(providers))]
}

async fn get_json(providers: Vec<Arc<dyn EndpointProvider>>, uri: &str) -> (StatusCode, JsonValue) {
    let routes = Arc::new(build_route_table(controllers(providers)));
    let app =
        test::init_service(App::new().configure(configure_routes(routes, Context::empty()))).await;
    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body: JsonValue = test::read_body_json(resp).await;
    (status, body)
}

#[actix_web::test]
async fn test_discovery_merges_providers_in_registration_order() {
    let providers = vec![
        static_provider(json!({ "x": 1, "y": 2 })),
        static_provider(json!({ "y": 3, "z": 4 })),
    ];
    let (status, body) = get_json(providers, DISCOVERY_URI).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "x": 1, "y": 3, "z": 4 }));
}

#[actix_web::test]
async fn test_discovery_without_providers_is_an_empty_object() {
    let (status, body) = get_json(vec![], DISCOVERY_URI).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[actix_web::test]
async fn test_discovery_responds_with_json_content_type() {
    let routes = Arc::new(build_route_table(controllers(vec![static_provider(
        json!({ "providers.v1": "/v1/providers/" }),
    )])));
    let app =
        test::init_service(App::new().configure(configure_routes(routes, Context::empty()))).await;

    let req = test::TestRequest::get().uri(DISCOVERY_URI).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap();
    assert_eq!(content_type.to_str().unwrap(), "application/json");
}

#[actix_web::test]
async fn test_discovery_is_not_cached_between_requests() {
    let generation: Arc<dyn EndpointProvider> = Arc::new(GenerationProvider::default());
    let routes = Arc::new(build_route_table(controllers(vec![generation])));
    let app =
        test::init_service(App::new().configure(configure_routes(routes, Context::empty()))).await;

    for expected in 0..3u64 {
        let req = test::TestRequest::get().uri(DISCOVERY_URI).to_request();
        let body: JsonValue = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "generation": expected }));
    }
}

#[actix_web::test]
async fn test_failing_provider_yields_server_error() {
    let providers = vec![
        static_provider(json!({ "providers.v1": "/v1/providers/" })),
        Arc::new(UnavailableProvider) as Arc<dyn EndpointProvider>,
    ];
    let (status, body) = get_json(providers, DISCOVERY_URI).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("module registry is still warming up"), "got: {message}");
}

#[actix_web::test]
async fn test_health_check() {
    let (status, body) = get_json(vec![], "/ping").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(true));
}

#[actix_web::test]
async fn test_unknown_path_is_not_found() {
    let routes = Arc::new(build_route_table(controllers(vec![])));
    let app =
        test::init_service(App::new().configure(configure_routes(routes, Context::empty()))).await;
    let req = test::TestRequest::get().uri("/.well-known/unknown.json").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_start_server_reports_bind_failures() {
    let err = start_server("not a socket address", controllers(vec![]), &Context::empty())
        .await
        .unwrap_err();
    let ServeError::Bind { binding, .. } = err;
    assert_eq!(binding, "not a socket address");
}

#[actix_web::test]
async fn test_start_and_stop_server() {
    let handle = start_server("127.0.0.1:0", controllers(vec![]), &Context::empty())
        .await
        .unwrap();
    handle.stop(true).await;
}
