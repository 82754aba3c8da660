//! Builders wiring outbound adapters into the domain services behind
//! [`HttpState`].

use std::sync::Arc;
use std::time::Duration;

use mockable::{Clock, DefaultClock};
use reqwest::Url;
use tracing::{info, warn};
use zeroize::Zeroizing;

use experience_backend::domain::ports::{
    ExperienceStore, Notifier, PasswordHasher, PosterRenderer, PosterStore, UserRepository,
};
use experience_backend::domain::{
    AccountService, ExperienceService, PosterService, UserAdminService, VerificationService,
};
use experience_backend::inbound::http::state::HttpState;
use experience_backend::outbound::memory::MemoryStore;
use experience_backend::outbound::notify::{HttpMailer, LogNotifier, MailerIdentity};
use experience_backend::outbound::password::Argon2Hasher;
use experience_backend::outbound::persistence::{DieselExperienceStore, DieselUserRepository};
use experience_backend::outbound::poster::{DirectoryPosterStore, SvgPosterRenderer};
use experience_backend::settings::AppSettings;

use super::ServerConfig;
use super::bootstrap::{StartupError, bootstrap_admin};

const MAIL_TIMEOUT: Duration = Duration::from_secs(10);

fn build_notifier(settings: &AppSettings) -> Result<Arc<dyn Notifier>, StartupError> {
    let Some(endpoint) = settings.mail_endpoint() else {
        warn!("no mail endpoint configured; notifications will only be logged");
        return Ok(Arc::new(LogNotifier));
    };
    let endpoint = Url::parse(endpoint).map_err(StartupError::MailEndpoint)?;
    let identity = MailerIdentity {
        sender_name: settings.mail_sender_name().to_owned(),
        sender_email: settings.mail_sender_email().to_owned(),
        api_key: Zeroizing::new(settings.mail_api_key.clone().unwrap_or_default()),
    };
    Ok(Arc::new(HttpMailer::new(endpoint, MAIL_TIMEOUT, identity)?))
}

/// Adapters shared by every service regardless of the store in use.
struct Collaborators<H, R, P> {
    hasher: Arc<H>,
    renderer: Arc<R>,
    posters: Arc<P>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl<H, R, P> Collaborators<H, R, P>
where
    H: PasswordHasher + 'static,
    R: PosterRenderer + 'static,
    P: PosterStore + 'static,
{
    async fn assemble<S, U>(
        self,
        settings: &AppSettings,
        store: Arc<S>,
        users: Arc<U>,
    ) -> Result<HttpState, StartupError>
    where
        S: ExperienceStore + 'static,
        U: UserRepository + 'static,
    {
        let experiences = Arc::new(ExperienceService::new(store.clone(), self.clock.clone()));
        let user_admin = UserAdminService::new(
            users.clone(),
            self.hasher.clone(),
            self.clock.clone(),
            settings.email_domain(),
        );
        if let Some(admin) = bootstrap_admin(settings, self.clock.utc())? {
            user_admin
                .ensure_admin(admin)
                .await
                .map_err(StartupError::Bootstrap)?;
        }

        Ok(HttpState {
            accounts: Arc::new(AccountService::new(
                users.clone(),
                self.hasher,
                self.notifier.clone(),
                self.clock,
            )),
            experiences: experiences.clone(),
            experience_query: experiences,
            verification: Arc::new(VerificationService::new(
                store.clone(),
                users.clone(),
                self.notifier.clone(),
            )),
            posters: Arc::new(PosterService::new(
                store,
                users,
                self.renderer,
                self.posters,
                self.notifier,
                settings.public_base_url(),
            )),
            user_admin: Arc::new(user_admin),
        })
    }
}

/// Build the HTTP state over PostgreSQL when a pool is configured and over
/// the in-memory store otherwise.
pub(crate) async fn build_http_state(config: &ServerConfig) -> Result<HttpState, StartupError> {
    let settings = &config.settings;
    let collaborators = Collaborators {
        hasher: Arc::new(Argon2Hasher::new()),
        renderer: Arc::new(SvgPosterRenderer::default()),
        posters: Arc::new(DirectoryPosterStore::open(&settings.poster_dir())?),
        notifier: build_notifier(settings)?,
        clock: Arc::new(DefaultClock),
    };

    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL store");
            collaborators
                .assemble(
                    settings,
                    Arc::new(DieselExperienceStore::new(pool.clone())),
                    Arc::new(DieselUserRepository::new(pool.clone())),
                )
                .await
        }
        None => {
            warn!("no database configured; data lives in memory and is lost on exit");
            let memory = Arc::new(MemoryStore::new());
            collaborators
                .assemble(settings, memory.clone(), memory)
                .await
        }
    }
}
