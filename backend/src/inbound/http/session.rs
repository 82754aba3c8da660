//! Session helpers that keep handlers free of cookie details.
//!
//! The cookie carries the user id and the instant the session was issued.
//! The issue time lets the authenticator reject sessions that predate a
//! password change.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ISSUED_AT_KEY: &str = "issued_at";

/// User id and issue time read back from the cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: UserId,
    pub issued_at: DateTime<Utc>,
}

/// Newtype wrapper exposing session operations in domain terms.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the identity, replacing any previous one.
    pub fn persist(&self, user_id: &UserId, issued_at: DateTime<Utc>) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .and_then(|()| self.0.insert(ISSUED_AT_KEY, issued_at.timestamp_millis()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Identity stored in the cookie. Malformed values read as no session.
    pub fn identity(&self) -> Result<Option<SessionIdentity>, Error> {
        let read_error = |error| Error::internal(format!("failed to read session: {error}"));
        let raw_id = self.0.get::<String>(USER_ID_KEY).map_err(read_error)?;
        let raw_issued = self.0.get::<i64>(ISSUED_AT_KEY).map_err(read_error)?;
        let (Some(raw_id), Some(raw_issued)) = (raw_id, raw_issued) else {
            return Ok(None);
        };
        let Ok(user_id) = UserId::new(&raw_id) else {
            warn!("invalid user id in session cookie");
            return Ok(None);
        };
        let Some(issued_at) = DateTime::from_timestamp_millis(raw_issued) else {
            warn!("invalid issue time in session cookie");
            return Ok(None);
        };
        Ok(Some(SessionIdentity { user_id, issued_at }))
    }

    /// Identity or `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<SessionIdentity, Error> {
        self.identity()?
            .ok_or_else(|| Error::unauthorized("you are not logged in"))
    }

    /// Drop the session and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    use super::*;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};

    const USER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
    const ISSUED_MS: i64 = 1_700_000_000_000;

    fn echo_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(test_session_middleware())
            .route(
                "/login",
                web::get().to(|session: SessionContext| async move {
                    let id = UserId::new(USER).expect("fixture id");
                    let issued = DateTime::from_timestamp_millis(ISSUED_MS).expect("timestamp");
                    session.persist(&id, issued)?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/whoami",
                web::get().to(|session: SessionContext| async move {
                    let identity = session.require_identity()?;
                    Ok::<_, Error>(HttpResponse::Ok().body(format!(
                        "{}@{}",
                        identity.user_id,
                        identity.issued_at.timestamp_millis()
                    )))
                }),
            )
            .route(
                "/logout",
                web::get().to(|session: SessionContext| async move {
                    session.purge();
                    HttpResponse::Ok()
                }),
            )
    }

    #[rstest]
    #[actix_web::test]
    async fn persisted_identity_reads_back() {
        let app = test::init_service(echo_app()).await;
        let login =
            test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
        let cookie = session_cookie(&login);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/whoami").cookie(cookie).to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body, format!("{USER}@{ISSUED_MS}"));
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_session_is_unauthorised() {
        let app = test::init_service(echo_app()).await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn logout_expires_the_cookie() {
        let app = test::init_service(echo_app()).await;
        let login =
            test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/logout")
                .cookie(session_cookie(&login))
                .to_request(),
        )
        .await;

        let expired = session_cookie(&res);
        assert_eq!(expired.value(), "");
    }

    #[rstest]
    #[case("not-a-uuid", ISSUED_MS)]
    #[case(USER, i64::MAX)]
    #[actix_web::test]
    async fn tampered_values_are_unauthorised(#[case] id: &'static str, #[case] issued: i64) {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set",
                    web::get().to(move |session: Session| async move {
                        session.insert(USER_ID_KEY, id).expect("insert id");
                        session.insert(ISSUED_AT_KEY, issued).expect("insert issued");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/whoami",
                    web::get().to(|session: SessionContext| async move {
                        session.require_identity()?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;
        let set = test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(session_cookie(&set))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
