//! Application settings loaded via OrthoConfig.
//!
//! Every field can come from the command line, `EXPERIENCE_*` environment
//! variables or a configuration file. Session cookie settings are read
//! separately by [`crate::inbound::http::session_config`].

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POSTER_DIR: &str = "posters";
const DEFAULT_EMAIL_DOMAIN: &str = "nitjsr.ac.in";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_SENDER_NAME: &str = "Placement Experiences";
const DEFAULT_SENDER_EMAIL: &str = "no-reply@localhost";

/// Runtime configuration for the server binary.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EXPERIENCE")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the server keeps everything in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled PostgreSQL connections. Zero keeps the pool's
    /// own default.
    #[ortho_config(default = 0)]
    pub database_pool_size: u32,
    /// Directory generated posters are written to.
    pub poster_dir: Option<PathBuf>,
    /// Domain appended to registration numbers during roster import.
    pub email_domain: Option<String>,
    /// Base URL used in links sent by email.
    pub public_base_url: Option<String>,
    /// Transactional mail API endpoint. Without one mail is only logged.
    pub mail_endpoint: Option<String>,
    pub mail_sender_name: Option<String>,
    pub mail_sender_email: Option<String>,
    pub mail_api_key: Option<String>,
    /// Registration number of an administrator created at start-up when
    /// missing. The account starts inactive and is claimed through signup.
    pub admin_reg_no: Option<String>,
    pub admin_name: Option<String>,
    pub admin_email: Option<String>,
    pub admin_batch: Option<i32>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn database_pool_size(&self) -> Option<u32> {
        Some(self.database_pool_size).filter(|size| *size > 0)
    }

    pub fn poster_dir(&self) -> PathBuf {
        self.poster_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_POSTER_DIR))
    }

    pub fn email_domain(&self) -> &str {
        self.email_domain.as_deref().unwrap_or(DEFAULT_EMAIL_DOMAIN)
    }

    pub fn public_base_url(&self) -> &str {
        self.public_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_BASE_URL)
    }

    pub fn mail_endpoint(&self) -> Option<&str> {
        self.mail_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn mail_sender_name(&self) -> &str {
        self.mail_sender_name
            .as_deref()
            .unwrap_or(DEFAULT_SENDER_NAME)
    }

    pub fn mail_sender_email(&self) -> &str {
        self.mail_sender_email
            .as_deref()
            .unwrap_or(DEFAULT_SENDER_EMAIL)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 14] = [
        "EXPERIENCE_BIND_ADDR",
        "EXPERIENCE_DATABASE_URL",
        "EXPERIENCE_DATABASE_POOL_SIZE",
        "EXPERIENCE_POSTER_DIR",
        "EXPERIENCE_EMAIL_DOMAIN",
        "EXPERIENCE_PUBLIC_BASE_URL",
        "EXPERIENCE_MAIL_ENDPOINT",
        "EXPERIENCE_MAIL_SENDER_NAME",
        "EXPERIENCE_MAIL_SENDER_EMAIL",
        "EXPERIENCE_MAIL_API_KEY",
        "EXPERIENCE_ADMIN_REG_NO",
        "EXPERIENCE_ADMIN_NAME",
        "EXPERIENCE_ADMIN_EMAIL",
        "EXPERIENCE_ADMIN_BATCH",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("experience-backend")])
            .expect("config should load")
    }

    fn cleared_except(
        overrides: &[(&'static str, &str)],
    ) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(cleared_except(&[]));

        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr(), DEFAULT_BIND_ADDR);
        assert!(settings.database_url().is_none());
        assert!(settings.database_pool_size().is_none());
        assert!(settings.mail_endpoint().is_none());
        assert_eq!(settings.poster_dir(), PathBuf::from(DEFAULT_POSTER_DIR));
        assert_eq!(settings.email_domain(), DEFAULT_EMAIL_DOMAIN);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(cleared_except(&[
            ("EXPERIENCE_BIND_ADDR", "127.0.0.1:9000"),
            ("EXPERIENCE_DATABASE_URL", "postgres://localhost/experiences"),
            ("EXPERIENCE_DATABASE_POOL_SIZE", "4"),
            ("EXPERIENCE_EMAIL_DOMAIN", "example.edu"),
            ("EXPERIENCE_MAIL_ENDPOINT", "https://mail.example.com/send"),
        ]));

        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr(), "127.0.0.1:9000");
        assert_eq!(
            settings.database_url(),
            Some("postgres://localhost/experiences")
        );
        assert_eq!(settings.database_pool_size(), Some(4));
        assert_eq!(settings.email_domain(), "example.edu");
        assert_eq!(
            settings.mail_endpoint(),
            Some("https://mail.example.com/send")
        );
    }

    #[rstest]
    fn zero_pool_size_keeps_the_pool_default() {
        let _guard = lock_env(cleared_except(&[("EXPERIENCE_DATABASE_POOL_SIZE", "0")]));

        let settings = load_from_empty_args();

        assert_eq!(settings.database_pool_size, 0);
        assert!(settings.database_pool_size().is_none());
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let _guard = lock_env(cleared_except(&[("EXPERIENCE_DATABASE_URL", "  ")]));

        assert!(load_from_empty_args().database_url().is_none());
    }
}
