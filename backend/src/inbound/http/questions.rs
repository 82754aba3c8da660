//! Question endpoints.
//!
//! ```text
//! POST   /api/v1/questions {"interview":"<id>","round":"<id>","title":"..."}
//! PATCH  /api/v1/questions/{id}
//! DELETE /api/v1/questions/{id}
//! ```

use actix_web::{HttpResponse, delete, patch, post, web};

use crate::domain::ports::{CreateQuestionRequest, UpdateQuestionRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::experience_dto::{
    CreateQuestionBody, QuestionBody, QuestionResponse, parse_question_changes,
    parse_question_draft,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, require};

/// Add a question to a round of an interview the caller owns.
#[utoipa::path(
    post,
    path = "/api/v1/questions",
    request_body = CreateQuestionBody,
    responses(
        (status = 201, description = "Question created", body = QuestionResponse),
        (status = 400, description = "Invalid request or round of another interview", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Interview or round not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["questions"],
    operation_id = "createQuestion",
    security(("SessionCookie" = []))
)]
#[post("/questions")]
pub async fn create_question(
    state: web::Data<HttpState>,
    user: Authenticated,
    payload: web::Json<CreateQuestionBody>,
) -> ApiResult<HttpResponse> {
    let CreateQuestionBody {
        interview,
        round,
        question,
    } = payload.into_inner();
    let interview = require(interview, FieldName::new("interview"))?;
    let round = require(round, FieldName::new("round"))?;
    let interview_id = parse_uuid(&interview, FieldName::new("interview"))?;
    let round_id = parse_uuid(&round, FieldName::new("round"))?;
    let draft = parse_question_draft(question)?;
    let created = state
        .experiences
        .create_question(CreateQuestionRequest {
            caller: user.caller(),
            interview_id,
            round_id,
            draft,
        })
        .await?;
    Ok(HttpResponse::Created().json(QuestionResponse::from(created)))
}

/// Edit a question's title, description or link.
#[utoipa::path(
    patch,
    path = "/api/v1/questions/{id}",
    params(("id" = String, Path, description = "Question id")),
    request_body = QuestionBody,
    responses(
        (status = 200, description = "Question updated", body = QuestionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["questions"],
    operation_id = "updateQuestion",
    security(("SessionCookie" = []))
)]
#[patch("/questions/{id}")]
pub async fn update_question(
    state: web::Data<HttpState>,
    user: Authenticated,
    path: web::Path<String>,
    payload: web::Json<QuestionBody>,
) -> ApiResult<web::Json<QuestionResponse>> {
    let question_id = parse_uuid(&path, FieldName::new("id"))?;
    let changes = parse_question_changes(payload.into_inner())?;
    let question = state
        .experiences
        .update_question(UpdateQuestionRequest {
            caller: user.caller(),
            question_id,
            changes,
        })
        .await?;
    Ok(web::Json(question.into()))
}

/// Delete a question.
#[utoipa::path(
    delete,
    path = "/api/v1/questions/{id}",
    params(("id" = String, Path, description = "Question id")),
    responses(
        (status = 204, description = "Question deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["questions"],
    operation_id = "deleteQuestion",
    security(("SessionCookie" = []))
)]
#[delete("/questions/{id}")]
pub async fn delete_question(
    state: web::Data<HttpState>,
    user: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let question_id = parse_uuid(&path, FieldName::new("id"))?;
    state
        .experiences
        .delete_question(user.caller(), question_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
