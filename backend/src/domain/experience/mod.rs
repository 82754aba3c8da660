//! Placement experience aggregate: interviews, their rounds and the
//! questions asked in each round.
//!
//! Values here are already validated; inbound adapters build them from raw
//! request bodies before calling a driving port.

mod fields;
mod model;

pub use fields::{
    COMPANY_MAX, COMPANY_MIN, CompanyName, Compensation, DESCRIPTION_MAX,
    ExperienceValidationError, InterviewStatus, NOTE_MAX, Offer, QuestionDescription,
    QuestionLink, QuestionTitle, RoundName, RoundNote, RoundType, TITLE_MAX, TITLE_MIN,
    VerificationStatus,
};
pub use model::{
    Interview, InterviewListing, InterviewView, Question, Round, RoundView, Verification,
};

use super::{PageRequest, UserId};

/// New question nested under a round.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDraft {
    pub title: QuestionTitle,
    pub description: Option<QuestionDescription>,
    pub link: Option<QuestionLink>,
}

/// New round, optionally carrying its questions.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundDraft {
    pub name: RoundName,
    pub round_type: RoundType,
    pub date: Option<i64>,
    pub note: Option<RoundNote>,
    pub questions: Vec<QuestionDraft>,
}

/// New interview with any nested rounds.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewDraft {
    pub company: CompanyName,
    pub status: InterviewStatus,
    pub offer: Option<Offer>,
    pub compensation: Option<Compensation>,
    pub rounds: Vec<RoundDraft>,
    /// Queue the interview for verification straight away.
    pub submit: bool,
}

/// Owner-editable interview fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterviewEdit {
    pub company: Option<CompanyName>,
    pub status: Option<InterviewStatus>,
    pub offer: Option<Offer>,
    pub compensation: Option<Compensation>,
    pub submit: bool,
}

/// Column-level interview changes written by the store.
///
/// Unlike [`InterviewEdit`] this also covers the fields only the workflow
/// and the poster service may touch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterviewChanges {
    pub company: Option<CompanyName>,
    pub status: Option<InterviewStatus>,
    pub offer: Option<Offer>,
    pub compensation: Option<Compensation>,
    pub verification: Option<Verification>,
    pub poster: Option<String>,
}

impl InterviewChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Owner-editable round fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundChanges {
    pub name: Option<RoundName>,
    pub round_type: Option<RoundType>,
    pub date: Option<i64>,
    pub note: Option<RoundNote>,
}

impl RoundChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Owner-editable question fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionChanges {
    pub title: Option<QuestionTitle>,
    pub description: Option<QuestionDescription>,
    pub link: Option<QuestionLink>,
}

impl QuestionChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Optional filters on the public listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterviewFilter {
    /// Matched case-insensitively against the whole company name.
    pub company: Option<String>,
    pub status: Option<InterviewStatus>,
    pub offer: Option<Offer>,
}

impl InterviewFilter {
    pub fn matches(&self, interview: &Interview) -> bool {
        let company_ok = self.company.as_deref().is_none_or(|company| {
            interview.company.as_ref().to_lowercase() == company.trim().to_lowercase()
        });
        let status_ok = self.status.is_none_or(|status| interview.status == status);
        let offer_ok = self.offer.is_none_or(|offer| interview.offer == Some(offer));
        company_ok && status_ok && offer_ok
    }
}

/// Which interviews a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// Accepted interviews, visible to everyone.
    Accepted,
    /// Every interview owned by the user.
    Owner(UserId),
    /// Interviews waiting for a verifier.
    VerificationQueue,
}

impl ListScope {
    pub fn includes(self, interview: &Interview) -> bool {
        match self {
            Self::Accepted => interview.verification.status == VerificationStatus::Accepted,
            Self::Owner(owner) => interview.interviewee == owner,
            Self::VerificationQueue => {
                interview.verification.status == VerificationStatus::InQueue
            }
        }
    }
}

/// Listing request passed to the store. Results are newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewListQuery {
    pub scope: ListScope,
    pub filter: InterviewFilter,
    pub page: PageRequest,
}

impl InterviewListQuery {
    pub fn matches(&self, interview: &Interview) -> bool {
        self.scope.includes(interview) && self.filter.matches(interview)
    }
}
