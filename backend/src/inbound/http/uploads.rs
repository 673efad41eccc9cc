//! Image upload handler.
//!
//! ```text
//! POST /api/v1/uploads?fileName=tent.jpg   (raw image bytes as the body)
//! ```
//!
//! The returned reference is what campground create and update bodies carry
//! in their `images` arrays.

use actix_web::{HttpRequest, HttpResponse, post, web};
use serde::Deserialize;

use crate::domain::ports::ImageUpload;
use crate::inbound::http::ApiResult;
use crate::inbound::http::campgrounds::ImageResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FILE_NAME, missing_field_error};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// Original file name; its extension must be jpeg, jpg or png.
    #[param(example = "tent.jpg")]
    pub file_name: Option<String>,
}

/// Store an image with the image host.
#[utoipa::path(
    post,
    path = "/api/v1/uploads",
    params(UploadQuery),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Hosted", body = ImageResponse),
        (status = 400, description = "Missing name, bad extension or empty body", body = ErrorSchema),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 503, description = "Image host unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["uploads"],
    operation_id = "uploadImage"
)]
#[post("/uploads")]
pub async fn upload_image(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let actor = session.actor_or_remember(&request)?;
    let file_name = query
        .into_inner()
        .file_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| missing_field_error(FILE_NAME))?;
    let image = state
        .uploads
        .upload(
            actor.as_ref(),
            ImageUpload {
                file_name,
                bytes: body.to_vec(),
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(ImageResponse::from(&image)))
}
