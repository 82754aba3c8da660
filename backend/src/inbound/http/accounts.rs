//! Account self-service endpoints.
//!
//! ```text
//! POST  /api/v1/users/signup          {"regNo":"2019ugcs001"}
//! POST  /api/v1/users/forgotPassword  {"regNo":"2019ugcs001"}
//! PATCH /api/v1/users/resetPassword   {"token":"A1B2C3","password":"...","passwordConfirm":"..."}
//! POST  /api/v1/users/login           {"email":"...","password":"..."}
//! GET   /api/v1/users/loginStatus
//! GET   /api/v1/users/logout
//! GET   /api/v1/users/myInterviews
//! PATCH /api/v1/users/updateMyPassword
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::ports::{ResetPasswordRequest, SessionGrant, UpdatePasswordRequest};
use crate::domain::{Error, LoginCredentials, NewPassword, RegNo, ResetToken, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{Authenticated, current_user};
use crate::inbound::http::experience_dto::{InterviewPageResponse, PageQuery};
use crate::inbound::http::interviews::owned_page;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, login_error, password_error, require, user_error,
};

/// Registration number body used by signup and forgot password.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegNoBody {
    #[schema(example = "2019ugcs001")]
    pub reg_no: Option<String>,
}

#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordBody {
    /// One-time token from the email.
    #[schema(example = "A1B2C3")]
    pub token: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordBody {
    pub password_current: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

/// Account details visible to the account owner and administrators.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "2019ugcs001")]
    pub reg_no: String,
    #[schema(example = 2023)]
    pub batch: i32,
    pub email: String,
    #[schema(example = "user")]
    pub role: String,
    pub active: bool,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.to_string(),
            reg_no: user.reg_no.to_string(),
            batch: user.batch.year(),
            email: user.email.to_string(),
            role: user.role.to_string(),
            active: user.active,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginStatusResponse {
    /// `null` when nobody is logged in.
    pub user: Option<UserResponse>,
}

fn reg_no_of(body: RegNoBody) -> Result<RegNo, Error> {
    let field = FieldName::new("regNo");
    let raw = require(body.reg_no, field)?;
    RegNo::new(&raw).map_err(|error| user_error(field, error))
}

fn start_session(session: &SessionContext, grant: SessionGrant) -> ApiResult<HttpResponse> {
    session.persist(&grant.user.id, grant.issued_at)?;
    Ok(HttpResponse::Ok().json(UserResponse::from(grant.user)))
}

fn otp_sent() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        message: "a one-time token was sent to your email".to_owned(),
    })
}

/// Email a signup OTP to an inactive account.
#[utoipa::path(
    post,
    path = "/api/v1/users/signup",
    request_body = RegNoBody,
    responses(
        (status = 200, description = "OTP sent", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown registration number", body = ErrorSchema),
        (status = 409, description = "Account already active", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "signup",
    security([])
)]
#[post("/users/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<RegNoBody>,
) -> ApiResult<HttpResponse> {
    let reg_no = reg_no_of(payload.into_inner())?;
    state.accounts.signup(reg_no).await?;
    Ok(otp_sent())
}

/// Email a password reset OTP to an active account.
#[utoipa::path(
    post,
    path = "/api/v1/users/forgotPassword",
    request_body = RegNoBody,
    responses(
        (status = 200, description = "OTP sent", body = MessageResponse),
        (status = 400, description = "Invalid request or account not registered", body = ErrorSchema),
        (status = 404, description = "Unknown registration number", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "forgotPassword",
    security([])
)]
#[post("/users/forgotPassword")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    payload: web::Json<RegNoBody>,
) -> ApiResult<HttpResponse> {
    let reg_no = reg_no_of(payload.into_inner())?;
    state.accounts.forgot_password(reg_no).await?;
    Ok(otp_sent())
}

/// Redeem an OTP, set the password and log in.
#[utoipa::path(
    patch,
    path = "/api/v1/users/resetPassword",
    request_body = ResetPasswordBody,
    responses(
        (status = 200, description = "Password set; session started", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid or expired token, or weak password", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "resetPassword",
    security([])
)]
#[patch("/users/resetPassword")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ResetPasswordBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let password =
        NewPassword::try_new(&body.password, &body.password_confirm).map_err(password_error)?;
    let grant = state
        .accounts
        .reset_password(ResetPasswordRequest {
            token: ResetToken::from_client(&body.token),
            password,
        })
        .await?;
    start_session(&session, grant)
}

/// Authenticate with email and password and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Login success", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Incorrect email or password", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&body.email, &body.password).map_err(login_error)?;
    let grant = state.accounts.login(credentials).await?;
    start_session(&session, grant)
}

/// Current user, or `null` without a valid session.
#[utoipa::path(
    get,
    path = "/api/v1/users/loginStatus",
    responses(
        (status = 200, description = "Login status", body = LoginStatusResponse),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "loginStatus",
    security([])
)]
#[get("/users/loginStatus")]
pub async fn login_status(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<LoginStatusResponse>> {
    let user = current_user(&state, &session).await?;
    Ok(web::Json(LoginStatusResponse {
        user: user.map(UserResponse::from),
    }))
}

/// End the session.
#[utoipa::path(
    get,
    path = "/api/v1/users/logout",
    responses((status = 204, description = "Logged out")),
    tags = ["accounts"],
    operation_id = "logout",
    security([])
)]
#[get("/users/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// The caller's interviews. Same as `GET /interviews/mine`.
#[utoipa::path(
    get,
    path = "/api/v1/users/myInterviews",
    params(PageQuery),
    responses(
        (status = 200, description = "Caller's interviews", body = InterviewPageResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "myInterviews",
    security(("SessionCookie" = []))
)]
#[get("/users/myInterviews")]
pub async fn my_interviews(
    state: web::Data<HttpState>,
    user: Authenticated,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<InterviewPageResponse>> {
    owned_page(&state, &user, query.into_inner()).await
}

/// Change the caller's password and re-issue the session.
#[utoipa::path(
    patch,
    path = "/api/v1/users/updateMyPassword",
    request_body = UpdatePasswordBody,
    responses(
        (status = 200, description = "Password changed", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Weak or mismatched password", body = ErrorSchema),
        (status = 401, description = "Wrong current password", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "updateMyPassword",
    security(("SessionCookie" = []))
)]
#[patch("/users/updateMyPassword")]
pub async fn update_my_password(
    state: web::Data<HttpState>,
    user: Authenticated,
    session: SessionContext,
    payload: web::Json<UpdatePasswordBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let password =
        NewPassword::try_new(&body.password, &body.password_confirm).map_err(password_error)?;
    let grant = state
        .accounts
        .update_password(UpdatePasswordRequest {
            user_id: user.user().id,
            current: Zeroizing::new(body.password_current),
            password,
        })
        .await?;
    start_session(&session, grant)
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
