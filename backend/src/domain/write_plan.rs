//! Unit-of-work plans for the experience aggregate.
//!
//! Every mutation of interviews, rounds or questions is expressed as a
//! [`WritePlan`]: an ordered list of [`StoreOp`]s that the store applies in
//! one transaction. Plans are built here without touching storage, so the
//! structural rules (back-references, cascades, denormalised copies) live in
//! the domain rather than in each adapter.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{
    CompanyName, Interview, InterviewChanges, InterviewDraft, Question, QuestionChanges,
    QuestionDraft, Round, RoundChanges, RoundDraft, RoundType, UserId, Verification,
    VerificationStatus,
};

/// Which questions a delete removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSelection {
    One(Uuid),
    OfRound(Uuid),
    OfInterview(Uuid),
}

/// Which rounds a delete removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundSelection {
    One(Uuid),
    OfInterview(Uuid),
}

/// Denormalised child update derived from a parent change.
#[derive(Debug, Clone, PartialEq)]
pub enum Propagation {
    /// Set `company` on every question of the interview.
    QuestionCompany {
        interview_id: Uuid,
        company: CompanyName,
    },
    /// Set `round_type` on every question of the round.
    QuestionRoundType { round_id: Uuid, round_type: RoundType },
}

/// Verification states an owner may still edit from.
pub const EDITABLE: &[VerificationStatus] = &[
    VerificationStatus::NotVerified,
    VerificationStatus::InQueue,
    VerificationStatus::Rejected,
];

/// Verification states a verifier may decide from.
pub const AWAITING_DECISION: &[VerificationStatus] = &[VerificationStatus::InQueue];

/// A single store mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    /// Abort the plan with a conflict unless the interview's stored
    /// verification status is one of `allowed` when the op runs.
    RequireVerification {
        interview_id: Uuid,
        allowed: &'static [VerificationStatus],
    },
    InsertInterview(Interview),
    InsertRound(Round),
    InsertQuestion(Question),
    UpdateInterview { id: Uuid, changes: InterviewChanges },
    UpdateRound { id: Uuid, changes: RoundChanges },
    UpdateQuestion { id: Uuid, changes: QuestionChanges },
    Propagate(Propagation),
    /// Append a round id to its interview's list.
    LinkRound { interview_id: Uuid, round_id: Uuid },
    UnlinkRound { interview_id: Uuid, round_id: Uuid },
    /// Append a question id to its round's list.
    LinkQuestion { round_id: Uuid, question_id: Uuid },
    UnlinkQuestion { round_id: Uuid, question_id: Uuid },
    DeleteQuestions(QuestionSelection),
    DeleteRounds(RoundSelection),
    DeleteInterview(Uuid),
}

/// Parent-side change a propagation rule inspects.
#[derive(Debug, Clone, Copy)]
pub enum ParentChange<'a> {
    Interview {
        current: &'a Interview,
        changes: &'a InterviewChanges,
    },
    Round {
        current: &'a Round,
        changes: &'a RoundChanges,
    },
}

/// Maps a parent change to the child update it implies, if any.
pub type PropagationRule = fn(ParentChange<'_>) -> Option<Propagation>;

/// Parent field changes that must be copied onto descendant questions.
pub const PROPAGATION_RULES: &[PropagationRule] = &[
    question_company_follows_interview,
    question_type_follows_round,
];

fn question_company_follows_interview(change: ParentChange<'_>) -> Option<Propagation> {
    let ParentChange::Interview { current, changes } = change else {
        return None;
    };
    let company = changes.company.as_ref()?;
    (company != &current.company).then(|| Propagation::QuestionCompany {
        interview_id: current.id,
        company: company.clone(),
    })
}

fn question_type_follows_round(change: ParentChange<'_>) -> Option<Propagation> {
    let ParentChange::Round { current, changes } = change else {
        return None;
    };
    let round_type = changes.round_type?;
    (round_type != current.round_type).then_some(Propagation::QuestionRoundType {
        round_id: current.id,
        round_type,
    })
}

/// Evaluate [`PROPAGATION_RULES`] against a parent change.
pub fn propagations(change: ParentChange<'_>) -> Vec<Propagation> {
    PROPAGATION_RULES
        .iter()
        .filter_map(|rule| rule(change))
        .collect()
}

/// Ordered operations committed atomically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WritePlan {
    ops: Vec<StoreOp>,
}

impl WritePlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: StoreOp) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[StoreOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<StoreOp> {
        self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Prefix the plan with a verification status check on `interview_id`.
    ///
    /// The check runs inside the commit, so a status change that lands
    /// between the caller's read and the commit aborts the whole plan.
    #[must_use]
    pub fn require_verification(
        mut self,
        interview_id: Uuid,
        allowed: &'static [VerificationStatus],
    ) -> Self {
        self.ops.insert(
            0,
            StoreOp::RequireVerification {
                interview_id,
                allowed,
            },
        );
        self
    }

    /// Insert an interview together with its nested rounds and questions.
    ///
    /// Id lists are filled in input order before the rows are written, so the
    /// aggregate is consistent as soon as the plan commits. Returns the new
    /// interview id.
    pub fn create_interview(
        interviewee: UserId,
        draft: InterviewDraft,
        now: DateTime<Utc>,
    ) -> (Uuid, Self) {
        let interview_id = Uuid::new_v4();
        let verification = if draft.submit {
            Verification::queued()
        } else {
            Verification::default()
        };
        let mut children = Self::new();
        let mut round_ids = Vec::with_capacity(draft.rounds.len());
        for round in draft.rounds {
            let (round_id, round_ops) =
                Self::round_with_questions(interview_id, interviewee, &draft.company, round, now);
            round_ids.push(round_id);
            children.ops.extend(round_ops.ops);
        }

        let mut plan = Self::new();
        plan.push(StoreOp::InsertInterview(Interview {
            id: interview_id,
            interviewee,
            company: draft.company,
            round_ids,
            status: draft.status,
            verification,
            offer: draft.offer,
            compensation: draft.compensation,
            poster: None,
            created_at: now,
        }));
        plan.ops.extend(children.ops);
        (interview_id, plan)
    }

    /// Insert a round (and its questions) under an existing interview.
    pub fn create_round(interview: &Interview, draft: RoundDraft, now: DateTime<Utc>) -> (Uuid, Self) {
        let (round_id, mut plan) = Self::round_with_questions(
            interview.id,
            interview.interviewee,
            &interview.company,
            draft,
            now,
        );
        plan.push(StoreOp::LinkRound {
            interview_id: interview.id,
            round_id,
        });
        (round_id, plan)
    }

    /// Insert a question under an existing round.
    pub fn create_question(
        interview: &Interview,
        round: &Round,
        draft: QuestionDraft,
        now: DateTime<Utc>,
    ) -> (Uuid, Self) {
        let question = new_question(interview.company.clone(), round, draft, now);
        let question_id = question.id;
        let mut plan = Self::new();
        plan.push(StoreOp::InsertQuestion(question));
        plan.push(StoreOp::LinkQuestion {
            round_id: round.id,
            question_id,
        });
        (question_id, plan)
    }

    /// Apply interview changes and copy a company rename onto its questions.
    pub fn update_interview(current: &Interview, changes: InterviewChanges) -> Self {
        let mut plan = Self::new();
        if changes.is_empty() {
            return plan;
        }
        let derived = propagations(ParentChange::Interview {
            current,
            changes: &changes,
        });
        plan.push(StoreOp::UpdateInterview {
            id: current.id,
            changes,
        });
        plan.ops.extend(derived.into_iter().map(StoreOp::Propagate));
        plan
    }

    /// Apply round changes and copy a type change onto its questions.
    pub fn update_round(current: &Round, changes: RoundChanges) -> Self {
        let mut plan = Self::new();
        if changes.is_empty() {
            return plan;
        }
        let derived = propagations(ParentChange::Round {
            current,
            changes: &changes,
        });
        plan.push(StoreOp::UpdateRound {
            id: current.id,
            changes,
        });
        plan.ops.extend(derived.into_iter().map(StoreOp::Propagate));
        plan
    }

    pub fn update_question(current: &Question, changes: QuestionChanges) -> Self {
        let mut plan = Self::new();
        if !changes.is_empty() {
            plan.push(StoreOp::UpdateQuestion {
                id: current.id,
                changes,
            });
        }
        plan
    }

    /// Delete questions, then rounds, then the interview.
    pub fn delete_interview(interview: &Interview) -> Self {
        let mut plan = Self::new();
        plan.push(StoreOp::DeleteQuestions(QuestionSelection::OfInterview(
            interview.id,
        )));
        plan.push(StoreOp::DeleteRounds(RoundSelection::OfInterview(
            interview.id,
        )));
        plan.push(StoreOp::DeleteInterview(interview.id));
        plan
    }

    pub fn delete_round(round: &Round) -> Self {
        let mut plan = Self::new();
        plan.push(StoreOp::DeleteQuestions(QuestionSelection::OfRound(round.id)));
        plan.push(StoreOp::UnlinkRound {
            interview_id: round.interview_id,
            round_id: round.id,
        });
        plan.push(StoreOp::DeleteRounds(RoundSelection::One(round.id)));
        plan
    }

    pub fn delete_question(question: &Question) -> Self {
        let mut plan = Self::new();
        plan.push(StoreOp::UnlinkQuestion {
            round_id: question.round_id,
            question_id: question.id,
        });
        plan.push(StoreOp::DeleteQuestions(QuestionSelection::One(question.id)));
        plan
    }

    fn round_with_questions(
        interview_id: Uuid,
        interviewee: UserId,
        company: &CompanyName,
        draft: RoundDraft,
        now: DateTime<Utc>,
    ) -> (Uuid, Self) {
        let mut round = Round {
            id: Uuid::new_v4(),
            interview_id,
            interviewee,
            name: draft.name,
            round_type: draft.round_type,
            date: draft.date,
            note: draft.note,
            question_ids: Vec::with_capacity(draft.questions.len()),
            created_at: now,
        };
        let questions: Vec<Question> = draft
            .questions
            .into_iter()
            .map(|question| new_question(company.clone(), &round, question, now))
            .collect();
        round.question_ids = questions.iter().map(|question| question.id).collect();

        let round_id = round.id;
        let mut plan = Self::new();
        plan.push(StoreOp::InsertRound(round));
        plan.ops
            .extend(questions.into_iter().map(StoreOp::InsertQuestion));
        (round_id, plan)
    }
}

fn new_question(
    company: CompanyName,
    round: &Round,
    draft: QuestionDraft,
    now: DateTime<Utc>,
) -> Question {
    Question {
        id: Uuid::new_v4(),
        round_id: round.id,
        interview_id: round.interview_id,
        interviewee: round.interviewee,
        company,
        round_type: round.round_type,
        title: draft.title,
        description: draft.description,
        link: draft.link,
        created_at: now,
    }
}

#[cfg(test)]
#[path = "write_plan_tests.rs"]
mod tests;
