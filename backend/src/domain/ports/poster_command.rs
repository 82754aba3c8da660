//! Driving port for poster generation and download.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Caller, Error};

use super::{PosterPhoto, RenderedPoster};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratePosterRequest {
    pub caller: Caller,
    pub interview_id: Uuid,
    pub photo: PosterPhoto,
}

/// Where the generated poster can be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterLink {
    pub download_path: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PosterCommand: Send + Sync {
    async fn generate(&self, request: GeneratePosterRequest) -> Result<PosterLink, Error>;

    async fn download(&self, caller: Caller, interview_id: Uuid)
    -> Result<RenderedPoster, Error>;
}

/// Download path served for an interview's poster.
pub fn poster_download_path(interview_id: Uuid) -> String {
    format!("/api/v1/interviews/{interview_id}/poster/download")
}
