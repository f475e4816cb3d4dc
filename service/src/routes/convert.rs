use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use common::{
    dtos::DetailDto,
    models::{ConvertedArtifact, UploadedImage},
};

use crate::{error::ApiError, state::Services};

const DEFAULT_OUTPUT_FORMAT: &str = "jpeg";

pub fn create_route(services: Services) -> Router {
    Router::new()
        .route("/api/convert", post(convert).options(convert_options))
        .route("/api/convert-batch", post(convert_batch))
        .with_state(services)
}

pub async fn convert_options() -> Json<DetailDto> {
    Json(DetailDto::new("OK"))
}

#[tracing::instrument(skip(services, multipart))]
pub async fn convert(State(services): State<Services>, multipart: Multipart) -> Result<Response, ApiError> {
    let form = read_form(multipart, "file").await?;
    let upload = form.files.into_iter().next();
    let output_format = form.output_format.unwrap_or_else(|| DEFAULT_OUTPUT_FORMAT.to_string());

    let Some(upload) = upload else {
        return Err(ApiError::BadRequest("No file provided".to_string()));
    };
    let artifact = services
        .convert_service
        .convert(upload, &output_format)
        .await
        .map_err(|err| ApiError::from_conversion(err, "Error converting file"))?;
    Ok(attachment(artifact))
}

#[tracing::instrument(skip(services, multipart))]
pub async fn convert_batch(State(services): State<Services>, multipart: Multipart) -> Result<Response, ApiError> {
    let form = read_form(multipart, "files").await?;
    let output_format = form.output_format.unwrap_or_else(|| DEFAULT_OUTPUT_FORMAT.to_string());

    let archive = services
        .convert_service
        .convert_batch(form.files, &output_format)
        .await
        .map_err(|err| ApiError::from_conversion(err, "Error converting files"))?;
    Ok(attachment(archive))
}

struct ConvertForm {
    files: Vec<UploadedImage>,
    output_format: Option<String>,
}

/// Collects every upload sent under `file_field`, in submission order, plus `output_format`.
async fn read_form(mut multipart: Multipart, file_field: &str) -> Result<ConvertForm, ApiError> {
    let mut form = ConvertForm {
        files: vec![],
        output_format: None,
    };
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == file_field {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(multipart_error)?;
            form.files.push(UploadedImage::new(filename, bytes));
        } else if name == "output_format" {
            form.output_format = Some(field.text().await.map_err(multipart_error)?);
        }
    }
    Ok(form)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::BadRequest(format!("Failed to parse multipart data: {}", err))
}

fn attachment(artifact: ConvertedArtifact) -> Response {
    let headers = [
        (header::CONTENT_TYPE, artifact.content_type.to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename={}", artifact.filename)),
    ];
    (headers, artifact.content).into_response()
}
