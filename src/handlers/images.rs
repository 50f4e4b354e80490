use axum::{extract::State, response::Response, Json};
use base64::Engine;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::ApiError;
use crate::handlers::common::{created_response, map_service_error, validate_input};
use crate::services::images::ImageUpload;
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UploadImageRequest {
    pub style_id: i64,
    pub po_line_id: Option<i64>,
    #[validate(length(min = 1, message = "filename is required"))]
    pub filename: String,
    /// Base64-encoded file content.
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/images",
    summary = "Upload image",
    description = "Store an image and attach its URL to the style (and optionally a PO line). Each attachment target reports its own success flag; a failed target never rolls back the upload.",
    request_body = UploadImageRequest,
    responses(
        (status = 201, description = "Image stored"),
        (status = 400, description = "Invalid base64 content or empty file", body = crate::errors::ErrorResponse),
        (status = 404, description = "Style not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn upload_image(
    State(state): State<AppState>,
    Json(request): Json<UploadImageRequest>,
) -> Result<Response, ApiError> {
    validate_input(&request)?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(request.content.as_bytes())
        .map_err(|_| ApiError::ValidationError("content is not valid base64".to_string()))?;

    let outcome = state
        .services
        .images
        .attach(ImageUpload {
            style_id: request.style_id,
            po_line_id: request.po_line_id,
            filename: request.filename,
            bytes,
        })
        .await
        .map_err(map_service_error)?;
    Ok(created_response(outcome))
}
