//! Poster generation and download for accepted experiences.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use super::account_service::map_user_error;
use super::experience_service::map_store_error;
use crate::domain::ports::{
    ExperienceStore, GeneratePosterRequest, Notification, Notifier, PosterCommand, PosterContent,
    PosterError, PosterLink, PosterRenderer, PosterStore, Recipient, RenderedPoster,
    UserRepository, poster_download_path,
};
use crate::domain::{
    Caller, Capability, Error, Interview, InterviewChanges, User, WritePlan, authorize,
};

fn map_poster_error(error: PosterError) -> Error {
    match error {
        PosterError::Render { message } => {
            Error::internal(format!("poster rendering failed: {message}"))
        }
        PosterError::Storage { message } => {
            Error::service_unavailable(format!("poster storage unavailable: {message}"))
        }
    }
}

/// Service implementing [`PosterCommand`].
#[derive(Clone)]
pub struct PosterService<S, U, R, P, N: ?Sized> {
    store: Arc<S>,
    users: Arc<U>,
    renderer: Arc<R>,
    posters: Arc<P>,
    notifier: Arc<N>,
    /// Prefix for links mailed to the interviewee, without a trailing slash.
    public_base_url: String,
}

impl<S, U, R, P, N: ?Sized> PosterService<S, U, R, P, N> {
    pub fn new(
        store: Arc<S>,
        users: Arc<U>,
        renderer: Arc<R>,
        posters: Arc<P>,
        notifier: Arc<N>,
        public_base_url: impl Into<String>,
    ) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_owned();
        Self {
            store,
            users,
            renderer,
            posters,
            notifier,
            public_base_url,
        }
    }
}

impl<S, U, R, P, N: ?Sized> PosterService<S, U, R, P, N>
where
    S: ExperienceStore,
    U: UserRepository,
    R: PosterRenderer,
    P: PosterStore,
    N: Notifier,
{
    /// Load an interview the caller owns and that has been accepted.
    async fn poster_interview(
        &self,
        caller: &Caller,
        interview_id: Uuid,
    ) -> Result<Interview, Error> {
        let interview = self
            .store
            .find_interview(&interview_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("interview {interview_id} not found")))?;
        authorize(caller, Capability::Own(&interview.interviewee))?;
        if !interview.verification.is_accepted() {
            return Err(Error::forbidden(
                "posters are only available for accepted experiences",
            ));
        }
        Ok(interview)
    }

    async fn owner(&self, interview: &Interview) -> Result<User, Error> {
        self.users
            .find_by_id(&interview.interviewee)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("the interviewee no longer exists"))
    }
}

#[async_trait]
impl<S, U, R, P, N: ?Sized> PosterCommand for PosterService<S, U, R, P, N>
where
    S: ExperienceStore,
    U: UserRepository,
    R: PosterRenderer,
    P: PosterStore,
    N: Notifier,
{
    async fn generate(&self, request: GeneratePosterRequest) -> Result<PosterLink, Error> {
        let interview = self
            .poster_interview(&request.caller, request.interview_id)
            .await?;
        let owner = self.owner(&interview).await?;

        let content = PosterContent {
            name: owner.name.to_string(),
            reg_no: owner.reg_no.to_string(),
            company: interview.company.to_string(),
            photo: request.photo,
        };
        let rendered = self
            .renderer
            .render(&content)
            .await
            .map_err(map_poster_error)?;
        let key = format!("{}-{}", owner.reg_no, interview.id);
        let reference = self
            .posters
            .save(&key, &rendered)
            .await
            .map_err(map_poster_error)?;

        let plan = WritePlan::update_interview(
            &interview,
            InterviewChanges {
                poster: Some(reference),
                ..Default::default()
            },
        );
        self.store.commit(plan).await.map_err(map_store_error)?;
        info!(interview_id = %interview.id, "poster generated");

        let download_path = poster_download_path(interview.id);
        let link = format!("{}{download_path}", self.public_base_url);
        if let Err(error) = self
            .notifier
            .send(&Recipient::from(&owner), &Notification::Poster { link })
            .await
        {
            warn!(interview_id = %interview.id, %error, "poster email failed");
        }
        Ok(PosterLink { download_path })
    }

    async fn download(
        &self,
        caller: Caller,
        interview_id: Uuid,
    ) -> Result<RenderedPoster, Error> {
        let interview = self.poster_interview(&caller, interview_id).await?;
        let reference = interview
            .poster
            .ok_or_else(|| Error::not_found("no poster has been generated for this interview"))?;
        self.posters
            .load(&reference)
            .await
            .map_err(map_poster_error)?
            .ok_or_else(|| Error::not_found("the stored poster could not be found"))
    }
}

#[cfg(test)]
#[path = "poster_service_tests.rs"]
mod tests;
