//! Test utilities for the backend crate.
//!
//! Shared by the unit tests under `src/`. Integration tests build their own
//! fixtures through the public API.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use crate::domain::{
    Batch, CompanyName, Email, Interview, InterviewStatus, InterviewView, Question,
    QuestionTitle, RegNo, Role, Round, RoundName, RoundType, RoundView, User, UserId, UserName,
    Verification, VerificationStatus,
};

pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 24, 10, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Clock frozen at [`fixture_timestamp`].
pub fn fixture_clock() -> Arc<dyn Clock> {
    clock_at(fixture_timestamp())
}

/// Clock frozen at `utc_now`.
pub fn clock_at(utc_now: DateTime<Utc>) -> Arc<dyn Clock> {
    Arc::new(FixtureClock { utc_now })
}

pub fn sample_user(role: Role) -> User {
    User {
        id: UserId::random(),
        name: UserName::new("Ada Lovelace").expect("name"),
        reg_no: RegNo::new("2019ugcs001").expect("reg no"),
        batch: Batch::new(2023).expect("batch"),
        email: Email::new("ada@example.com").expect("email"),
        role,
        active: true,
        password_hash: "$argon2id$stub".to_owned(),
        password_changed_at: None,
        reset_token: None,
        reset_expires_at: None,
        created_at: fixture_timestamp(),
    }
}

pub fn sample_interview(owner: UserId, status: VerificationStatus) -> Interview {
    Interview {
        id: Uuid::new_v4(),
        interviewee: owner,
        company: CompanyName::new("Acme").expect("company"),
        round_ids: Vec::new(),
        status: InterviewStatus::Ongoing,
        verification: Verification {
            status,
            faults: Vec::new(),
        },
        offer: None,
        compensation: None,
        poster: None,
        created_at: fixture_timestamp(),
    }
}

pub fn sample_round(interview: &Interview) -> Round {
    Round {
        id: Uuid::new_v4(),
        interview_id: interview.id,
        interviewee: interview.interviewee,
        name: RoundName::new("OA").expect("round name"),
        round_type: RoundType::Oa,
        date: None,
        note: None,
        question_ids: Vec::new(),
        created_at: fixture_timestamp(),
    }
}

pub fn sample_question(interview: &Interview, round: &Round) -> Question {
    Question {
        id: Uuid::new_v4(),
        round_id: round.id,
        interview_id: interview.id,
        interviewee: interview.interviewee,
        company: interview.company.clone(),
        round_type: round.round_type,
        title: QuestionTitle::new("Two Sum problem explained").expect("title"),
        description: None,
        link: None,
        created_at: fixture_timestamp(),
    }
}

/// Populated view of `interview` with one round holding one question.
pub fn sample_view(interview: &Interview) -> InterviewView {
    let mut round = sample_round(interview);
    let question = sample_question(interview, &round);
    round.question_ids.push(question.id);
    let mut interview = interview.clone();
    interview.round_ids = vec![round.id];
    InterviewView {
        interview,
        interviewee: None,
        rounds: vec![RoundView {
            round,
            questions: vec![question],
        }],
    }
}
