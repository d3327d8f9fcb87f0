use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use serde::Serialize;
use utoipa::ToSchema;

use super::{MediaError, read_upload};
use crate::gateway::error::{ApiError, ApiResult, ErrorBody};
use crate::gateway::state::AppState;

pub const IMAGE_FIELD: &str = "image";
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    #[schema(example = "https://res.cloudinary.com/demo/image/upload/v1/hyjain-products/abc.png")]
    pub image_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FileUploadResponse {
    #[serde(rename = "fileUUID")]
    #[schema(example = "17be4678-dab7-4bc7-8753-28914a22960a")]
    pub file_uuid: String,
}

/// Multipart form of `POST /api/upload-image`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ImageUploadForm {
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
}

/// Multipart form of `POST /api/upload-file`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct FileUploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

fn with_context(context: &'static str) -> impl FnOnce(MediaError) -> ApiError {
    move |err| match err {
        MediaError::Upstream(e) => ApiError::upstream(context, e),
        other => other.into(),
    }
}

/// Upload a product image
///
/// POST /api/upload-image
#[utoipa::path(
    post,
    path = "/api/upload-image",
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = ImageUploadResponse),
        (status = 400, description = "No image part or unsupported format", body = ErrorBody),
        (status = 500, description = "Image storage error", body = ErrorBody)
    ),
    tag = "Media"
)]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ImageUploadResponse>> {
    let mut multipart = multipart?;
    let upload = read_upload(&mut multipart, IMAGE_FIELD)
        .await?
        .ok_or(MediaError::MissingPart("No image file uploaded."))?;

    let image_url = state
        .images
        .upload_image(upload)
        .await
        .map_err(with_context("Image upload failed"))?;

    tracing::info!("[media] Image stored at {}", image_url);
    Ok(Json(ImageUploadResponse { image_url }))
}

/// Upload a file
///
/// POST /api/upload-file
#[utoipa::path(
    post,
    path = "/api/upload-file",
    request_body(content = FileUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = FileUploadResponse),
        (status = 400, description = "No file part", body = ErrorBody),
        (status = 500, description = "File storage error", body = ErrorBody)
    ),
    tag = "Media"
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<FileUploadResponse>> {
    let mut multipart = multipart?;
    let upload = read_upload(&mut multipart, FILE_FIELD)
        .await?
        .ok_or(MediaError::MissingPart("No file uploaded."))?;

    let file_uuid = state
        .files
        .upload_file(upload)
        .await
        .map_err(with_context("File upload failed"))?;

    tracing::info!("[media] File stored as {}", file_uuid);
    Ok(Json(FileUploadResponse { file_uuid }))
}
