//! Start-up failures and the bootstrap administrator.

use chrono::{DateTime, Datelike, Utc};
use thiserror::Error;
use tracing::info;

use experience_backend::domain::ports::NewUser;
use experience_backend::domain::{Batch, Email, Error, RegNo, Role, UserName, UserValidationError};
use experience_backend::inbound::http::session_config::SessionConfigError;
use experience_backend::outbound::persistence::{MigrationError, PoolError};
use experience_backend::settings::AppSettings;

const DEFAULT_ADMIN_NAME: &str = "Administrator";

/// Errors that stop the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid session configuration: {0}")]
    Session(#[from] SessionConfigError),
    #[error("invalid bind address {addr}: {source}")]
    BindAddr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("database pool error: {0}")]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Migration(#[from] MigrationError),
    #[error("invalid mail endpoint: {0}")]
    MailEndpoint(url::ParseError),
    #[error("failed to build mail client: {0}")]
    Mailer(#[from] reqwest::Error),
    #[error("invalid bootstrap administrator: {0}")]
    AdminSettings(#[from] UserValidationError),
    #[error("failed to create bootstrap administrator: {0}")]
    Bootstrap(Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The administrator described by `EXPERIENCE_ADMIN_*`, if any.
///
/// The email defaults to the registration number at the roster domain and
/// the batch to the current year.
pub(crate) fn bootstrap_admin(
    settings: &AppSettings,
    now: DateTime<Utc>,
) -> Result<Option<NewUser>, StartupError> {
    let Some(raw_reg_no) = settings.admin_reg_no.as_deref() else {
        info!(reason = "unset", "bootstrap administrator skipped");
        return Ok(None);
    };
    let reg_no = RegNo::new(raw_reg_no)?;
    let email = match settings.admin_email.as_deref() {
        Some(email) => Email::new(email)?,
        None => reg_no.email_at(settings.email_domain())?,
    };
    Ok(Some(NewUser {
        name: UserName::new(
            settings
                .admin_name
                .as_deref()
                .unwrap_or(DEFAULT_ADMIN_NAME),
        )?,
        batch: Batch::new(settings.admin_batch.unwrap_or_else(|| now.year()))?,
        reg_no,
        email,
        role: Role::Admin,
    }))
}
