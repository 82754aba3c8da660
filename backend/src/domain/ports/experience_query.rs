//! Driving port for experience reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Error, InterviewFilter, InterviewListing, InterviewView, Page, PageRequest, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExperienceQuery: Send + Sync {
    /// Populated interview. Public.
    async fn get_interview(&self, interview_id: Uuid) -> Result<InterviewView, Error>;

    /// Accepted interviews matching `filter`, newest first.
    async fn list_accepted(
        &self,
        filter: InterviewFilter,
        page: PageRequest,
    ) -> Result<Page<InterviewListing>, Error>;

    /// Every interview owned by `owner`, newest first.
    async fn list_owned(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> Result<Page<InterviewListing>, Error>;
}
