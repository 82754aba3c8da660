//! Server construction and middleware wiring.

mod bootstrap;
mod config;
mod state_builders;

pub use bootstrap::StartupError;
pub use config::ServerConfig;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use experience_backend::Trace;
#[cfg(debug_assertions)]
use experience_backend::doc::ApiDoc;
use experience_backend::inbound::http::configure_api;
use experience_backend::inbound::http::health::{HealthState, live, ready};
use experience_backend::inbound::http::state::HttpState;
use state_builders::build_http_state;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: SessionMiddleware<CookieSessionStore>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1").wrap(session).configure(configure_api);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Wire the services for `config` and bind the listener.
///
/// Readiness flips once the socket is bound.
///
/// # Errors
///
/// Adapter construction failures, including the bootstrap administrator,
/// and socket bind errors.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> Result<Server, StartupError> {
    let http_state = web::Data::new(build_http_state(&config).await?);
    let ServerConfig {
        session,
        bind_addr,
        db_pool: _,
        settings: _,
    } = config;

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(
            server_health_state.clone(),
            http_state.clone(),
            session.middleware(),
        )
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
