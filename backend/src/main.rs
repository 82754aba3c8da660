//! Backend entry-point: loads settings, prepares persistence and serves the
//! REST API with its OpenAPI docs.

mod server;

use std::net::SocketAddr;

use actix_web::web;
use color_eyre::eyre::WrapErr;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use experience_backend::inbound::http::health::HealthState;
use experience_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use experience_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use experience_backend::settings::AppSettings;
use server::{ServerConfig, StartupError, create_server};

async fn server_config(settings: AppSettings) -> Result<ServerConfig, StartupError> {
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())?;
    let bind_addr: SocketAddr =
        settings
            .bind_addr()
            .parse()
            .map_err(|source| StartupError::BindAddr {
                addr: settings.bind_addr().to_owned(),
                source,
            })?;

    let database_url = settings.database_url().map(str::to_owned);
    let pool_size = settings.database_pool_size();
    let config = ServerConfig::new(session, bind_addr, settings);
    let Some(database_url) = database_url else {
        return Ok(config);
    };
    run_migrations(&database_url).await?;
    let mut pool_config = PoolConfig::new(database_url);
    if let Some(size) = pool_size {
        pool_config = pool_config.with_max_size(size).with_min_idle(Some(size.min(2)));
    }
    let pool = DbPool::new(pool_config).await?;
    Ok(config.with_db_pool(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let config = server_config(settings)
        .await
        .wrap_err("failed to prepare server")?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)
        .await
        .wrap_err("failed to start server")?;
    info!("server listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result.wrap_err("server terminated abnormally")
}
