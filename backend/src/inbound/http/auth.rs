//! Session authentication for HTTP handlers.
//!
//! [`Authenticated`] resolves the session cookie into the current [`User`]
//! through [`AccountCommand::authenticate`](crate::domain::ports::AccountCommand),
//! so handlers that need a caller just take it as an argument.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Caller, Error, ErrorCode, User};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// The user behind a valid session.
#[derive(Debug, Clone)]
pub struct Authenticated(pub User);

impl Authenticated {
    pub fn caller(&self) -> Caller {
        Caller::new(self.0.id, self.0.role)
    }

    pub fn user(&self) -> &User {
        &self.0
    }
}

fn state_of(req: &HttpRequest) -> Result<web::Data<HttpState>, Error> {
    req.app_data::<web::Data<HttpState>>()
        .cloned()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))
}

/// Resolve the session to a user, or `None` when it is missing or stale.
pub async fn current_user(
    state: &HttpState,
    session: &SessionContext,
) -> Result<Option<User>, Error> {
    let Some(identity) = session.identity()? else {
        return Ok(None);
    };
    match state
        .accounts
        .authenticate(identity.user_id, identity.issued_at)
        .await
    {
        Ok(user) => Ok(Some(user)),
        Err(error) if error.code() == ErrorCode::Unauthorized => {
            debug!(reason = error.message(), "stale session ignored");
            Ok(None)
        }
        Err(error) => Err(error),
    }
}

impl FromRequest for Authenticated {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let state = state_of(req);
        let session = SessionContext::from_request(req, payload);
        Box::pin(async move {
            let state = state?;
            let identity = session.await?.require_identity()?;
            let user = state
                .accounts
                .authenticate(identity.user_id, identity.issued_at)
                .await?;
            Ok(Self(user))
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use chrono::DateTime;
    use rstest::rstest;

    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::{MockPorts, session_cookie, test_session_middleware};
    use crate::test_support::sample_user;

    async fn whoami(user: Authenticated) -> HttpResponse {
        HttpResponse::Ok().body(user.user().reg_no.to_string())
    }

    async fn login(session: SessionContext) -> Result<HttpResponse, Error> {
        let user = sample_user(Role::User);
        let issued = DateTime::from_timestamp_millis(1_700_000_000_000).expect("timestamp");
        session.persist(&user.id, issued)?;
        Ok(HttpResponse::Ok().finish())
    }

    async fn call_whoami(ports: MockPorts, logged_in: bool) -> (StatusCode, String) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ports.into_state()))
                .wrap(test_session_middleware())
                .route("/login", web::get().to(login))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;
        let mut request = test::TestRequest::get().uri("/whoami");
        if logged_in {
            let res =
                test::call_service(&app, test::TestRequest::get().uri("/login").to_request())
                    .await;
            request = request.cookie(session_cookie(&res));
        }
        let res = test::call_service(&app, request.to_request()).await;
        let status = res.status();
        let body = test::read_body(res).await;
        (status, String::from_utf8(body.to_vec()).expect("utf8"))
    }

    #[rstest]
    #[actix_web::test]
    async fn valid_session_resolves_user() {
        let mut ports = MockPorts::default();
        ports
            .accounts
            .expect_authenticate()
            .times(1)
            .returning(|_, _| Ok(sample_user(Role::User)));

        let (status, body) = call_whoami(ports, true).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, sample_user(Role::User).reg_no.to_string());
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_session_never_reaches_the_port() {
        let mut ports = MockPorts::default();
        ports.accounts.expect_authenticate().times(0);

        let (status, _) = call_whoami(ports, false).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn rejected_session_is_unauthorised() {
        let mut ports = MockPorts::default();
        ports.accounts.expect_authenticate().returning(|_, _| {
            Err(Error::unauthorized(
                "password recently changed, please log in again",
            ))
        });

        let (status, _) = call_whoami(ports, true).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
