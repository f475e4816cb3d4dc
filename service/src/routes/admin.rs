use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::{header, request::Parts},
    routing::{get, post},
    Json, Router,
};
use common::{
    auth::BasicCredentials,
    dtos::{MessageDto, PostWriteDto},
    error::StoreError,
    models::PostModel,
};
use tracing::{info, warn};

use crate::{error::ApiError, state::Services};

pub fn create_route(services: Services) -> Router {
    Router::new()
        .route("/api/admin/login", post(login))
        .route("/api/admin/posts", get(posts).post(create_post))
        .route("/api/admin/posts/:post_id", get(post_by_id).put(update_post).delete(delete_post))
        .with_state(services)
}

/// Extracting this guards a handler behind the admin Basic-auth check.
pub struct Admin;

#[async_trait]
impl FromRequestParts<Services> for Admin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, services: &Services) -> Result<Self, Self::Rejection> {
        let credentials = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(BasicCredentials::from_authorization)
            .ok_or(ApiError::Unauthorized)?;
        if services.admin_auth.verify(&credentials) {
            Ok(Admin)
        } else {
            warn!("Rejected admin credentials for '{}'", &credentials.username);
            Err(ApiError::Unauthorized)
        }
    }
}

pub async fn login(_: Admin) -> Json<MessageDto> {
    Json(MessageDto::new("Login successful"))
}

pub async fn posts(_: Admin, State(services): State<Services>) -> Json<Vec<PostModel>> {
    Json(services.post_store.list().await)
}

#[tracing::instrument(skip(services))]
pub async fn post_by_id(_: Admin, State(services): State<Services>, Path(post_id): Path<String>) -> Result<Json<PostModel>, ApiError> {
    let post = services.post_store.get(&post_id).await.ok_or(StoreError::NotFound)?;
    Ok(Json(post))
}

#[tracing::instrument(skip(services, post))]
pub async fn create_post(_: Admin, State(services): State<Services>, Json(post): Json<PostModel>) -> Result<Json<PostWriteDto>, ApiError> {
    let post = services.post_store.insert(post).await?;
    info!("Created post {}", post.id().unwrap_or_default());
    Ok(Json(PostWriteDto {
        message: "Post created successfully".to_string(),
        post,
    }))
}

#[tracing::instrument(skip(services, post))]
pub async fn update_post(_: Admin, State(services): State<Services>, Path(post_id): Path<String>, Json(post): Json<PostModel>) -> Result<Json<PostWriteDto>, ApiError> {
    let post = services.post_store.replace(&post_id, post).await?;
    info!("Updated post {}", &post_id);
    Ok(Json(PostWriteDto {
        message: "Post updated successfully".to_string(),
        post,
    }))
}

#[tracing::instrument(skip(services))]
pub async fn delete_post(_: Admin, State(services): State<Services>, Path(post_id): Path<String>) -> Result<Json<MessageDto>, ApiError> {
    services.post_store.delete(&post_id).await?;
    info!("Deleted post {}", &post_id);
    Ok(Json(MessageDto::new("Post deleted successfully")))
}
