//! Port for experience aggregate persistence.
//!
//! All writes go through [`ExperienceStore::commit`], which applies a
//! [`WritePlan`] atomically. Reads return domain entities; adapters never
//! leak their row types.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Interview, InterviewListQuery, InterviewListing, InterviewView, Page, Question, Round,
    WritePlan,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by experience store adapters.
    pub enum ExperienceStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "experience store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "experience store query failed: {message}",
        /// A uniqueness constraint or serialisation check rejected the plan.
        Conflict { message: String } => "experience store conflict: {message}",
        /// A plan operation targeted a row that no longer exists.
        MissingRecord { message: String } => "experience store record missing: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExperienceStore: Send + Sync {
    /// Apply every operation of `plan` or none of them.
    async fn commit(&self, plan: WritePlan) -> Result<(), ExperienceStoreError>;

    async fn find_interview(&self, id: &Uuid) -> Result<Option<Interview>, ExperienceStoreError>;

    async fn find_round(&self, id: &Uuid) -> Result<Option<Round>, ExperienceStoreError>;

    async fn find_question(&self, id: &Uuid) -> Result<Option<Question>, ExperienceStoreError>;

    /// Interview with interviewee summary and rounds/questions in list order.
    async fn load_interview_view(
        &self,
        id: &Uuid,
    ) -> Result<Option<InterviewView>, ExperienceStoreError>;

    /// Page of interviews matching `query`, newest first.
    async fn list_interviews(
        &self,
        query: &InterviewListQuery,
    ) -> Result<Page<InterviewListing>, ExperienceStoreError>;
}
