use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use common::dtos::RootDto;
use common::util::consts::{NAME, VERSION};

pub fn create_route() -> Router {
    Router::new()
        .route("/api", get(root_links))
        .route("/api/", get(root_links))
        .route("/health", get(health))
}

pub async fn root_links() -> Json<RootDto<'static>> {
    Json(RootDto {
        name: NAME,
        version: VERSION,
        message: "Hello World",
    })
}

#[tracing::instrument]
pub async fn health() -> StatusCode {
    StatusCode::OK
}
