use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::{
    dtos::DetailDto,
    error::{ConvertError, StoreError},
};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized,
    NotFound(String),
    Internal(String),
}

impl ApiError {
    /// Validation failures pass through as 400; decode/encode failures become 500
    /// with `context` in front of the original message.
    pub fn from_conversion(err: ConvertError, context: &str) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(format!("{}: {}", context, err))
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound(err.to_string()),
            StoreError::Conflict | StoreError::InvalidDocument => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, Json(DetailDto::new(detail))).into_response(),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, Json(DetailDto::new(detail))).into_response(),
            ApiError::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, Json(DetailDto::new(detail))).into_response(),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Basic")],
                Json(DetailDto::new("Invalid credentials")),
            )
                .into_response(),
        }
    }
}
