pub mod admin;
pub mod blog;
pub mod convert;
pub mod root;

use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::{HeaderValue, StatusCode},
    BoxError, Router,
};
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::{Services, Settings};

pub fn create_router(services: Services, settings: &Settings) -> Router {
    let router = Router::new()
        .merge(root::create_route())
        .merge(convert::create_route(services.clone()))
        .merge(blog::create_route(services.clone()))
        .merge(admin::create_route(services))
        .layer(DefaultBodyLimit::max(settings.max_upload_bytes));
    // the cors layer answers every OPTIONS request itself
    let router = match cors_layer(&settings.cors_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    };
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(HandleErrorLayer::new(|_: BoxError| async { StatusCode::REQUEST_TIMEOUT }))
            .layer(TimeoutLayer::new(settings.request_timeout)),
    )
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins.iter().filter_map(|origin| HeaderValue::from_str(origin.trim()).ok()))
    };
    Some(CorsLayer::new().allow_origin(allow_origin).allow_methods(Any).allow_headers(Any))
}
