//! Interview endpoints.
//!
//! ```text
//! POST   /api/v1/interviews
//! GET    /api/v1/interviews?company=Acme&status=placed&page=1&limit=20
//! GET    /api/v1/interviews/mine
//! GET    /api/v1/interviews/{id}
//! PATCH  /api/v1/interviews/{id}
//! DELETE /api/v1/interviews/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::ports::{CreateInterviewRequest, UpdateInterviewRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::experience_dto::{
    CreateInterviewBody, InterviewListParams, InterviewPageResponse, InterviewResponse,
    PageQuery, UpdateInterviewBody, parse_filter, parse_interview_draft, parse_interview_edit,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, page_request, parse_uuid};

pub(super) fn interview_id(raw: &str) -> Result<Uuid, Error> {
    parse_uuid(raw, FieldName::new("id"))
}

/// Create an interview with any nested rounds and questions.
#[utoipa::path(
    post,
    path = "/api/v1/interviews",
    request_body = CreateInterviewBody,
    responses(
        (status = 201, description = "Interview created", body = InterviewResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Duplicate round name", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["interviews"],
    operation_id = "createInterview",
    security(("SessionCookie" = []))
)]
#[post("/interviews")]
pub async fn create_interview(
    state: web::Data<HttpState>,
    user: Authenticated,
    payload: web::Json<CreateInterviewBody>,
) -> ApiResult<HttpResponse> {
    let draft = parse_interview_draft(payload.into_inner())?;
    let view = state
        .experiences
        .create_interview(CreateInterviewRequest {
            caller: user.caller(),
            draft,
        })
        .await?;
    Ok(HttpResponse::Created().json(InterviewResponse::from(view)))
}

/// List accepted interviews, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/interviews",
    params(InterviewListParams),
    responses(
        (status = 200, description = "Accepted interviews", body = InterviewPageResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["interviews"],
    operation_id = "listInterviews",
    security([])
)]
#[get("/interviews")]
pub async fn list_interviews(
    state: web::Data<HttpState>,
    params: web::Query<InterviewListParams>,
) -> ApiResult<web::Json<InterviewPageResponse>> {
    let params = params.into_inner();
    let filter = parse_filter(&params)?;
    let page = page_request(params.page, params.limit)?;
    let listing = state.experience_query.list_accepted(filter, page).await?;
    Ok(web::Json(listing.into()))
}

pub(super) async fn owned_page(
    state: &HttpState,
    user: &Authenticated,
    query: PageQuery,
) -> ApiResult<web::Json<InterviewPageResponse>> {
    let page = page_request(query.page, query.limit)?;
    let listing = state.experience_query.list_owned(user.user().id, page).await?;
    Ok(web::Json(listing.into()))
}

/// List the caller's interviews in any verification state.
#[utoipa::path(
    get,
    path = "/api/v1/interviews/mine",
    params(PageQuery),
    responses(
        (status = 200, description = "Caller's interviews", body = InterviewPageResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["interviews"],
    operation_id = "listMyInterviews",
    security(("SessionCookie" = []))
)]
#[get("/interviews/mine")]
pub async fn my_interviews(
    state: web::Data<HttpState>,
    user: Authenticated,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<InterviewPageResponse>> {
    owned_page(&state, &user, query.into_inner()).await
}

/// Fetch one interview with its rounds and questions.
#[utoipa::path(
    get,
    path = "/api/v1/interviews/{id}",
    params(("id" = String, Path, description = "Interview id")),
    responses(
        (status = 200, description = "Interview", body = InterviewResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["interviews"],
    operation_id = "getInterview",
    security([])
)]
#[get("/interviews/{id}")]
pub async fn get_interview(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<InterviewResponse>> {
    let id = interview_id(&path)?;
    let view = state.experience_query.get_interview(id).await?;
    Ok(web::Json(view.into()))
}

/// Edit an interview the caller owns. Accepted interviews are frozen.
#[utoipa::path(
    patch,
    path = "/api/v1/interviews/{id}",
    params(("id" = String, Path, description = "Interview id")),
    request_body = UpdateInterviewBody,
    responses(
        (status = 200, description = "Interview updated", body = InterviewResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner or already accepted", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["interviews"],
    operation_id = "updateInterview",
    security(("SessionCookie" = []))
)]
#[patch("/interviews/{id}")]
pub async fn update_interview(
    state: web::Data<HttpState>,
    user: Authenticated,
    path: web::Path<String>,
    payload: web::Json<UpdateInterviewBody>,
) -> ApiResult<web::Json<InterviewResponse>> {
    let interview_id = interview_id(&path)?;
    let edit = parse_interview_edit(payload.into_inner())?;
    let view = state
        .experiences
        .update_interview(UpdateInterviewRequest {
            caller: user.caller(),
            interview_id,
            edit,
        })
        .await?;
    Ok(web::Json(view.into()))
}

/// Delete an interview with its rounds and questions.
#[utoipa::path(
    delete,
    path = "/api/v1/interviews/{id}",
    params(("id" = String, Path, description = "Interview id")),
    responses(
        (status = 204, description = "Interview deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["interviews"],
    operation_id = "deleteInterview",
    security(("SessionCookie" = []))
)]
#[delete("/interviews/{id}")]
pub async fn delete_interview(
    state: web::Data<HttpState>,
    user: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = interview_id(&path)?;
    state.experiences.delete_interview(user.caller(), id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "interviews_tests.rs"]
mod tests;
