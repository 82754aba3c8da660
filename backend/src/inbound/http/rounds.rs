//! Round endpoints.
//!
//! ```text
//! POST   /api/v1/rounds {"interview":"<id>","name":"OA","type":"oa","questions":[...]}
//! PATCH  /api/v1/rounds/{id}
//! DELETE /api/v1/rounds/{id}
//! ```

use actix_web::{HttpResponse, delete, patch, post, web};

use crate::domain::ports::{CreateRoundRequest, UpdateRoundRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::experience_dto::{
    CreateRoundBody, RoundResponse, UpdateRoundBody, parse_round_changes, parse_round_draft,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, require};

/// Add a round, with any nested questions, to an interview the caller owns.
#[utoipa::path(
    post,
    path = "/api/v1/rounds",
    request_body = CreateRoundBody,
    responses(
        (status = 201, description = "Round created", body = RoundResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Interview not found", body = ErrorSchema),
        (status = 409, description = "Duplicate round name", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["rounds"],
    operation_id = "createRound",
    security(("SessionCookie" = []))
)]
#[post("/rounds")]
pub async fn create_round(
    state: web::Data<HttpState>,
    user: Authenticated,
    payload: web::Json<CreateRoundBody>,
) -> ApiResult<HttpResponse> {
    let CreateRoundBody { interview, round } = payload.into_inner();
    let interview = require(interview, FieldName::new("interview"))?;
    let interview_id = parse_uuid(&interview, FieldName::new("interview"))?;
    let draft = parse_round_draft(round)?;
    let view = state
        .experiences
        .create_round(CreateRoundRequest {
            caller: user.caller(),
            interview_id,
            draft,
        })
        .await?;
    Ok(HttpResponse::Created().json(RoundResponse::from(view)))
}

/// Edit a round. A new type is copied onto its questions.
#[utoipa::path(
    patch,
    path = "/api/v1/rounds/{id}",
    params(("id" = String, Path, description = "Round id")),
    request_body = UpdateRoundBody,
    responses(
        (status = 200, description = "Round updated", body = RoundResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Duplicate round name", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["rounds"],
    operation_id = "updateRound",
    security(("SessionCookie" = []))
)]
#[patch("/rounds/{id}")]
pub async fn update_round(
    state: web::Data<HttpState>,
    user: Authenticated,
    path: web::Path<String>,
    payload: web::Json<UpdateRoundBody>,
) -> ApiResult<web::Json<RoundResponse>> {
    let round_id = parse_uuid(&path, FieldName::new("id"))?;
    let changes = parse_round_changes(payload.into_inner())?;
    let view = state
        .experiences
        .update_round(UpdateRoundRequest {
            caller: user.caller(),
            round_id,
            changes,
        })
        .await?;
    Ok(web::Json(view.into()))
}

/// Delete a round and its questions.
#[utoipa::path(
    delete,
    path = "/api/v1/rounds/{id}",
    params(("id" = String, Path, description = "Round id")),
    responses(
        (status = 204, description = "Round deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["rounds"],
    operation_id = "deleteRound",
    security(("SessionCookie" = []))
)]
#[delete("/rounds/{id}")]
pub async fn delete_round(
    state: web::Data<HttpState>,
    user: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let round_id = parse_uuid(&path, FieldName::new("id"))?;
    state.experiences.delete_round(user.caller(), round_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
