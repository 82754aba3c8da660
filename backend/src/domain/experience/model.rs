//! Interview, round and question entities plus their read models.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::fields::{
    CompanyName, Compensation, InterviewStatus, Offer, QuestionDescription, QuestionLink,
    QuestionTitle, RoundName, RoundNote, RoundType, VerificationStatus,
};
use crate::domain::{UserId, UserSummary};

/// Verification state plus the notes left by the last rejection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Verification {
    pub status: VerificationStatus,
    pub faults: Vec<String>,
}

impl Verification {
    /// State after the owner submits (or resubmits) for review.
    pub fn queued() -> Self {
        Self {
            status: VerificationStatus::InQueue,
            faults: Vec::new(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == VerificationStatus::Accepted
    }
}

/// Root of the experience aggregate.
///
/// ## Invariants
/// - `round_ids` only lists rounds whose `interview_id` is this interview.
/// - `interviewee` never changes after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Interview {
    pub id: Uuid,
    pub interviewee: UserId,
    pub company: CompanyName,
    pub round_ids: Vec<Uuid>,
    pub status: InterviewStatus,
    pub verification: Verification,
    pub offer: Option<Offer>,
    pub compensation: Option<Compensation>,
    pub poster: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One stage of an interview.
///
/// `(name, interview_id)` is unique. `question_ids` only lists questions whose
/// `round_id` is this round.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub interviewee: UserId,
    pub name: RoundName,
    pub round_type: RoundType,
    /// Epoch milliseconds.
    pub date: Option<i64>,
    pub note: Option<RoundNote>,
    pub question_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A question asked during a round.
///
/// `company` and `round_type` are copies of the parents' values, kept in
/// sync by the write plans.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: Uuid,
    pub round_id: Uuid,
    pub interview_id: Uuid,
    pub interviewee: UserId,
    pub company: CompanyName,
    pub round_type: RoundType,
    pub title: QuestionTitle,
    pub description: Option<QuestionDescription>,
    pub link: Option<QuestionLink>,
    pub created_at: DateTime<Utc>,
}

/// A round with its questions in list order.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundView {
    pub round: Round,
    pub questions: Vec<Question>,
}

/// Fully populated interview.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewView {
    pub interview: Interview,
    pub interviewee: Option<UserSummary>,
    pub rounds: Vec<RoundView>,
}

/// Interview row in a listing, with the interviewee's public identity.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewListing {
    pub interview: Interview,
    pub interviewee: Option<UserSummary>,
}
