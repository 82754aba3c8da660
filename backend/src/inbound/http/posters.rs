//! Poster endpoints for accepted interviews.
//!
//! ```text
//! POST /api/v1/interviews/{id}/poster            (Content-Type: image/*)
//! GET  /api/v1/interviews/{id}/poster/download
//! ```

use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{GeneratePosterRequest, PosterPhoto};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::interviews::interview_id;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Largest photo accepted for a poster.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PosterLinkResponse {
    #[schema(example = "/api/v1/interviews/3fa85f64-5717-4562-b3fc-2c963f66afa6/poster/download")]
    pub download: String,
}

fn image_content_type(req: &HttpRequest) -> Result<String, Error> {
    let raw = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let essence = raw.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    if essence.starts_with("image/") && essence.len() > "image/".len() {
        Ok(essence)
    } else {
        Err(Error::invalid_request("please upload an image").with_details(json!({
            "field": "Content-Type",
            "value": raw,
            "code": "unsupported_media_type",
        })))
    }
}

/// Render a poster for an accepted interview from the uploaded photo.
#[utoipa::path(
    post,
    path = "/api/v1/interviews/{id}/poster",
    params(("id" = String, Path, description = "Interview id")),
    request_body(content = Vec<u8>, content_type = "image/*", description = "Photo"),
    responses(
        (status = 200, description = "Poster generated", body = PosterLinkResponse),
        (status = 400, description = "Not an image", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner or not accepted", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["posters"],
    operation_id = "generatePoster",
    security(("SessionCookie" = []))
)]
#[post("/interviews/{id}/poster")]
pub async fn generate_poster(
    state: web::Data<HttpState>,
    user: Authenticated,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<PosterLinkResponse>> {
    let interview_id = interview_id(&path)?;
    let content_type = image_content_type(&req)?;
    if body.is_empty() {
        return Err(Error::invalid_request("please upload an image"));
    }
    let link = state
        .posters
        .generate(GeneratePosterRequest {
            caller: user.caller(),
            interview_id,
            photo: PosterPhoto {
                content_type,
                bytes: body.to_vec(),
            },
        })
        .await?;
    Ok(web::Json(PosterLinkResponse {
        download: link.download_path,
    }))
}

/// Download the generated poster.
#[utoipa::path(
    get,
    path = "/api/v1/interviews/{id}/poster/download",
    params(("id" = String, Path, description = "Interview id")),
    responses(
        (status = 200, description = "Poster file", content_type = "image/svg+xml", body = Vec<u8>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner or not accepted", body = ErrorSchema),
        (status = 404, description = "No poster generated", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["posters"],
    operation_id = "downloadPoster",
    security(("SessionCookie" = []))
)]
#[get("/interviews/{id}/poster/download")]
pub async fn download_poster(
    state: web::Data<HttpState>,
    user: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let interview_id = interview_id(&path)?;
    let poster = state.posters.download(user.caller(), interview_id).await?;
    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(format!(
            "{interview_id}.{}",
            poster.extension
        ))],
    };
    Ok(HttpResponse::Ok()
        .content_type(poster.content_type)
        .insert_header(disposition)
        .body(poster.bytes))
}
