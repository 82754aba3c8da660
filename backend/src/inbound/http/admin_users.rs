//! Administrator account management.
//!
//! ```text
//! GET    /api/v1/users?page=1&limit=20
//! POST   /api/v1/users
//! GET    /api/v1/users/{regNo}
//! PATCH  /api/v1/users/{regNo}
//! DELETE /api/v1/users/{regNo}
//! POST   /api/v1/users/batch/{year}   [{"name":"Ada Lovelace","regNo":"2019ugcs001"}]
//! ```
//!
//! Role checks live in the domain service; handlers only need a session.

use std::str::FromStr;

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{NewUser, RosterEntry, RosterImportReport, UserUpdate};
use crate::domain::{Batch, Email, Error, Page, RegNo, Role, User, UserName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::accounts::UserResponse;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::experience_dto::PageQuery;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, page_request, require, user_error};

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody {
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[schema(example = "2019ugcs001")]
    pub reg_no: Option<String>,
    #[schema(example = 2023)]
    pub batch: Option<i32>,
    pub email: Option<String>,
    /// Defaults to `user`.
    #[schema(example = "verifier")]
    pub role: Option<String>,
}

/// Fields an administrator may change. Unknown fields, including
/// `password`, are rejected.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub batch: Option<i32>,
    pub role: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntryBody {
    pub name: String,
    pub reg_no: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPageResponse {
    pub results: Vec<UserResponse>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl From<Page<User>> for UserPageResponse {
    fn from(page: Page<User>) -> Self {
        let total_pages = page.total_pages();
        let page = page.map(UserResponse::from);
        Self {
            results: page.results,
            page: page.page,
            limit: page.limit,
            total: page.total,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterFailureResponse {
    pub reg_no: String,
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterImportResponse {
    pub total: usize,
    pub created: usize,
    pub failed: usize,
    pub failures: Vec<RosterFailureResponse>,
}

impl From<RosterImportReport> for RosterImportResponse {
    fn from(report: RosterImportReport) -> Self {
        Self {
            total: report.total,
            created: report.created,
            failed: report.failed,
            failures: report
                .failures
                .into_iter()
                .map(|failure| RosterFailureResponse {
                    reg_no: failure.reg_no,
                    reason: failure.reason,
                })
                .collect(),
        }
    }
}

const NAME: FieldName = FieldName::new("name");
const REG_NO: FieldName = FieldName::new("regNo");
const BATCH: FieldName = FieldName::new("batch");
const EMAIL: FieldName = FieldName::new("email");
const ROLE: FieldName = FieldName::new("role");

fn reg_no_param(raw: &str) -> Result<RegNo, Error> {
    RegNo::new(raw).map_err(|error| user_error(REG_NO, error))
}

fn name_of(raw: String) -> Result<UserName, Error> {
    UserName::new(raw).map_err(|error| user_error(NAME, error))
}

fn batch_of(year: i32) -> Result<Batch, Error> {
    Batch::new(year).map_err(|error| user_error(BATCH, error))
}

fn email_of(raw: &str) -> Result<Email, Error> {
    Email::new(raw).map_err(|error| user_error(EMAIL, error))
}

fn role_of(raw: &str) -> Result<Role, Error> {
    Role::from_str(raw.trim()).map_err(|error| user_error(ROLE, error))
}

fn parse_new_user(body: CreateUserBody) -> Result<NewUser, Error> {
    Ok(NewUser {
        name: name_of(require(body.name, NAME)?)?,
        reg_no: reg_no_param(&require(body.reg_no, REG_NO)?)?,
        batch: batch_of(require(body.batch, BATCH)?)?,
        email: email_of(&require(body.email, EMAIL)?)?,
        role: body.role.as_deref().map(role_of).transpose()?.unwrap_or_default(),
    })
}

fn parse_update(body: UpdateUserBody) -> Result<UserUpdate, Error> {
    Ok(UserUpdate {
        name: body.name.map(name_of).transpose()?,
        email: body.email.as_deref().map(email_of).transpose()?,
        batch: body.batch.map(batch_of).transpose()?,
        role: body.role.as_deref().map(role_of).transpose()?,
        active: body.active,
    })
}

/// List accounts, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(PageQuery),
    responses(
        (status = 200, description = "Accounts", body = UserPageResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not an administrator", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security(("SessionCookie" = []))
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    user: Authenticated,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<UserPageResponse>> {
    let query = query.into_inner();
    let page = page_request(query.page, query.limit)?;
    let users = state.user_admin.list_users(user.caller(), page).await?;
    Ok(web::Json(users.into()))
}

/// Create an inactive account with a random password.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserBody,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not an administrator", body = ErrorSchema),
        (status = 409, description = "Registration number or email taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security(("SessionCookie" = []))
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    user: Authenticated,
    payload: web::Json<CreateUserBody>,
) -> ApiResult<HttpResponse> {
    let new_user = parse_new_user(payload.into_inner())?;
    let created = state.user_admin.create_user(user.caller(), new_user).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{regNo}",
    params(("regNo" = String, Path, description = "Registration number")),
    responses(
        (status = 200, description = "Account", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not an administrator", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security(("SessionCookie" = []))
)]
#[get("/users/{regNo}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    user: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let reg_no = reg_no_param(&path)?;
    let found = state.user_admin.get_user(user.caller(), reg_no).await?;
    Ok(web::Json(found.into()))
}

/// Edit an account. Passwords cannot be changed here.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{regNo}",
    params(("regNo" = String, Path, description = "Registration number")),
    request_body = UpdateUserBody,
    responses(
        (status = 200, description = "Account updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not an administrator", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Email taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser",
    security(("SessionCookie" = []))
)]
#[patch("/users/{regNo}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    user: Authenticated,
    path: web::Path<String>,
    payload: web::Json<UpdateUserBody>,
) -> ApiResult<web::Json<UserResponse>> {
    let reg_no = reg_no_param(&path)?;
    let update = parse_update(payload.into_inner())?;
    let updated = state
        .user_admin
        .update_user(user.caller(), reg_no, update)
        .await?;
    Ok(web::Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{regNo}",
    params(("regNo" = String, Path, description = "Registration number")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not an administrator", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser",
    security(("SessionCookie" = []))
)]
#[delete("/users/{regNo}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    user: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let reg_no = reg_no_param(&path)?;
    state.user_admin.delete_user(user.caller(), reg_no).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Create inactive accounts for a batch from a roster.
///
/// Entries are validated one by one; failures are reported rather than
/// aborting the import.
#[utoipa::path(
    post,
    path = "/api/v1/users/batch/{year}",
    params(("year" = i32, Path, description = "Batch year")),
    request_body = Vec<RosterEntryBody>,
    responses(
        (status = 200, description = "Import report", body = RosterImportResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not an administrator", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "importRoster",
    security(("SessionCookie" = []))
)]
#[post("/users/batch/{year}")]
pub async fn import_roster(
    state: web::Data<HttpState>,
    user: Authenticated,
    path: web::Path<i32>,
    payload: web::Json<Vec<RosterEntryBody>>,
) -> ApiResult<web::Json<RosterImportResponse>> {
    let batch = batch_of(path.into_inner())?;
    let entries = payload
        .into_inner()
        .into_iter()
        .map(|entry| RosterEntry {
            name: entry.name,
            reg_no: entry.reg_no,
        })
        .collect();
    let report = state
        .user_admin
        .import_roster(user.caller(), batch, entries)
        .await?;
    Ok(web::Json(report.into()))
}

#[cfg(test)]
#[path = "admin_users_tests.rs"]
mod tests;
