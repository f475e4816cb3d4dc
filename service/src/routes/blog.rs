use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use common::{error::StoreError, models::PostModel};

use crate::{error::ApiError, state::Services};

pub fn create_route(services: Services) -> Router {
    Router::new()
        .route("/api/blog/posts", get(blog_posts))
        .route("/api/blog/posts/:post_id", get(blog_post))
        .with_state(services)
}

pub async fn blog_posts(State(services): State<Services>) -> Response {
    let posts = services.post_store.list().await;
    (
        [
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        Json(posts),
    )
        .into_response()
}

#[tracing::instrument(skip(services))]
pub async fn blog_post(State(services): State<Services>, Path(post_id): Path<String>) -> Result<Json<PostModel>, ApiError> {
    let post = services.post_store.get(&post_id).await.ok_or(StoreError::NotFound)?;
    Ok(Json(post))
}
