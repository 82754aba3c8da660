//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};
use chrono::Utc;

use crate::domain::ports::{
    MockAccountCommand, MockExperienceCommand, MockExperienceQuery, MockPosterCommand,
    MockUserAdminCommand, MockVerificationCommand,
};
use crate::domain::{User, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{ApiResult, configure_api};

const TEST_LOGIN_PATH: &str = "/test-login";

/// Session middleware with a fresh key and an insecure cookie for plain HTTP.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set on a response.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Mock driving ports; tests set expectations then call [`MockPorts::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockAccountCommand,
    pub experiences: MockExperienceCommand,
    pub experience_query: MockExperienceQuery,
    pub verification: MockVerificationCommand,
    pub posters: MockPosterCommand,
    pub user_admin: MockUserAdminCommand,
}

impl MockPorts {
    /// Every session resolves to `user`.
    pub fn authenticate_as(&mut self, user: User) {
        self.accounts
            .expect_authenticate()
            .returning(move |_, _| Ok(user.clone()));
    }

    pub fn into_state(self) -> HttpState {
        HttpState {
            accounts: Arc::new(self.accounts),
            experiences: Arc::new(self.experiences),
            experience_query: Arc::new(self.experience_query),
            verification: Arc::new(self.verification),
            posters: Arc::new(self.posters),
            user_admin: Arc::new(self.user_admin),
        }
    }
}

async fn test_login(session: SessionContext) -> ApiResult<HttpResponse> {
    session.persist(&UserId::random(), Utc::now())?;
    Ok(HttpResponse::Ok().finish())
}

/// The full `/api/v1` surface over mock ports, plus a login shortcut.
pub async fn init_api(
    ports: MockPorts,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(ports.into_state()))
            .wrap(test_session_middleware())
            .route(TEST_LOGIN_PATH, web::get().to(test_login))
            .service(web::scope("/api/v1").configure(configure_api)),
    )
    .await
}

/// A session cookie for the user configured with [`MockPorts::authenticate_as`].
pub async fn login_cookie(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
) -> Cookie<'static> {
    let res = test::call_service(app, test::TestRequest::get().uri(TEST_LOGIN_PATH).to_request())
        .await;
    session_cookie(&res)
}

/// Status and JSON body of a response.
pub async fn json_response(res: ServiceResponse) -> (actix_web::http::StatusCode, serde_json::Value) {
    let status = res.status();
    let body = test::read_body(res).await;
    let value = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, value)
}
