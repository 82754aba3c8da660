//! Verification endpoints for admins and verifiers.
//!
//! ```text
//! GET   /api/v1/interviews/verificationQueue
//! PATCH /api/v1/interviews/{id}/accepted
//! PATCH /api/v1/interviews/{id}/rejected {"faults":["missing rounds"]}
//! ```

use actix_web::{get, patch, web};

use crate::domain::ports::RejectInterviewRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::experience_dto::{
    InterviewPageResponse, InterviewResponse, PageQuery, RejectBody,
};
use crate::inbound::http::interviews::interview_id;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::page_request;

/// Interviews waiting for review, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/interviews/verificationQueue",
    params(PageQuery),
    responses(
        (status = 200, description = "Verification queue", body = InterviewPageResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a verifier", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["verification"],
    operation_id = "verificationQueue",
    security(("SessionCookie" = []))
)]
#[get("/interviews/verificationQueue")]
pub async fn verification_queue(
    state: web::Data<HttpState>,
    user: Authenticated,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<InterviewPageResponse>> {
    let query = query.into_inner();
    let page = page_request(query.page, query.limit)?;
    let queue = state.verification.queue(user.caller(), page).await?;
    Ok(web::Json(queue.into()))
}

/// Accept an interview and notify its owner.
#[utoipa::path(
    patch,
    path = "/api/v1/interviews/{id}/accepted",
    params(("id" = String, Path, description = "Interview id")),
    responses(
        (status = 200, description = "Interview accepted", body = InterviewResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a verifier", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["verification"],
    operation_id = "acceptInterview",
    security(("SessionCookie" = []))
)]
#[patch("/interviews/{id}/accepted")]
pub async fn accept_interview(
    state: web::Data<HttpState>,
    user: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<InterviewResponse>> {
    let id = interview_id(&path)?;
    let view = state.verification.accept(user.caller(), id).await?;
    Ok(web::Json(view.into()))
}

/// Reject an interview with optional faults and notify its owner.
#[utoipa::path(
    patch,
    path = "/api/v1/interviews/{id}/rejected",
    params(("id" = String, Path, description = "Interview id")),
    request_body(content = RejectBody, description = "Faults shown to the owner"),
    responses(
        (status = 200, description = "Interview rejected", body = InterviewResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a verifier", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["verification"],
    operation_id = "rejectInterview",
    security(("SessionCookie" = []))
)]
#[patch("/interviews/{id}/rejected")]
pub async fn reject_interview(
    state: web::Data<HttpState>,
    user: Authenticated,
    path: web::Path<String>,
    payload: Option<web::Json<RejectBody>>,
) -> ApiResult<web::Json<InterviewResponse>> {
    let interview_id = interview_id(&path)?;
    let faults = payload
        .map(|body| body.into_inner().faults)
        .unwrap_or_default()
        .into_iter()
        .map(|fault| fault.trim().to_owned())
        .filter(|fault| !fault.is_empty())
        .collect();
    let view = state
        .verification
        .reject(RejectInterviewRequest {
            caller: user.caller(),
            interview_id,
            faults,
        })
        .await?;
    Ok(web::Json(view.into()))
}
