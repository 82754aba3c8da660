//! Driving port for the verification workflow.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Caller, Error, InterviewListing, InterviewView, Page, PageRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectInterviewRequest {
    pub caller: Caller,
    pub interview_id: Uuid,
    /// Notes for the owner. May be empty.
    pub faults: Vec<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationCommand: Send + Sync {
    /// Move an in-queue interview to accepted.
    async fn accept(&self, caller: Caller, interview_id: Uuid) -> Result<InterviewView, Error>;

    /// Move an in-queue interview to rejected.
    async fn reject(&self, request: RejectInterviewRequest) -> Result<InterviewView, Error>;

    /// In-queue interviews, newest first.
    async fn queue(
        &self,
        caller: Caller,
        page: PageRequest,
    ) -> Result<Page<InterviewListing>, Error>;
}
