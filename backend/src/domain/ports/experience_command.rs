//! Driving port for owner mutations of the experience aggregate.
//!
//! Every operation takes the authenticated [`Caller`]; ownership and the
//! accepted-is-immutable rule are enforced behind this port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Caller, Error, InterviewDraft, InterviewEdit, InterviewView, Question, QuestionChanges,
    QuestionDraft, RoundChanges, RoundDraft, RoundView,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CreateInterviewRequest {
    pub caller: Caller,
    pub draft: InterviewDraft,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateInterviewRequest {
    pub caller: Caller,
    pub interview_id: Uuid,
    pub edit: InterviewEdit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateRoundRequest {
    pub caller: Caller,
    pub interview_id: Uuid,
    pub draft: RoundDraft,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRoundRequest {
    pub caller: Caller,
    pub round_id: Uuid,
    pub changes: RoundChanges,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateQuestionRequest {
    pub caller: Caller,
    pub interview_id: Uuid,
    pub round_id: Uuid,
    pub draft: QuestionDraft,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQuestionRequest {
    pub caller: Caller,
    pub question_id: Uuid,
    pub changes: QuestionChanges,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExperienceCommand: Send + Sync {
    async fn create_interview(
        &self,
        request: CreateInterviewRequest,
    ) -> Result<InterviewView, Error>;

    async fn update_interview(
        &self,
        request: UpdateInterviewRequest,
    ) -> Result<InterviewView, Error>;

    async fn delete_interview(&self, caller: Caller, interview_id: Uuid) -> Result<(), Error>;

    async fn create_round(&self, request: CreateRoundRequest) -> Result<RoundView, Error>;

    async fn update_round(&self, request: UpdateRoundRequest) -> Result<RoundView, Error>;

    async fn delete_round(&self, caller: Caller, round_id: Uuid) -> Result<(), Error>;

    async fn create_question(&self, request: CreateQuestionRequest) -> Result<Question, Error>;

    async fn update_question(&self, request: UpdateQuestionRequest) -> Result<Question, Error>;

    async fn delete_question(&self, caller: Caller, question_id: Uuid) -> Result<(), Error>;
}
