//! In-process store used when no database is configured and by the
//! integration tests.
//!
//! [`MemoryStore`] implements both [`ExperienceStore`] and [`UserRepository`]
//! over one shared state so user deletion can cascade to interviews the way
//! the PostgreSQL foreign keys do. A commit applies its plan to a copy of the
//! state and swaps it in only when every operation succeeded.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::{
    ExperienceStore, ExperienceStoreError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Email, Interview, InterviewChanges, InterviewListQuery, InterviewListing, InterviewView,
    Page, PageRequest, Propagation, Question, QuestionChanges, QuestionSelection, RegNo,
    ResetTokenDigest, Round, RoundChanges, RoundSelection, RoundView, StoreOp, User, UserId,
    WritePlan,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    interviews: HashMap<Uuid, Interview>,
    rounds: HashMap<Uuid, Round>,
    questions: HashMap<Uuid, Question>,
}

/// Thread-safe in-memory adapter for the experience and user ports.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

fn missing(kind: &str, id: Uuid) -> ExperienceStoreError {
    ExperienceStoreError::missing_record(format!("{kind} {id} not found"))
}

fn offset_of(page: PageRequest) -> usize {
    usize::try_from(page.offset()).unwrap_or(usize::MAX)
}

fn page_of<T>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let results = items
        .into_iter()
        .skip(offset_of(page))
        .take(page.limit() as usize)
        .collect();
    Page::new(results, page, total)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, String> {
        self.state
            .lock()
            .map_err(|_| "memory store lock poisoned".to_owned())
    }

    fn experience_state(&self) -> Result<MutexGuard<'_, MemoryState>, ExperienceStoreError> {
        self.lock().map_err(ExperienceStoreError::connection)
    }

    fn user_state(&self) -> Result<MutexGuard<'_, MemoryState>, UserPersistenceError> {
        self.lock().map_err(UserPersistenceError::connection)
    }
}

impl MemoryState {
    fn ensure_round_name_free(&self, round: &Round) -> Result<(), ExperienceStoreError> {
        let taken = self.rounds.values().any(|other| {
            other.id != round.id
                && other.interview_id == round.interview_id
                && other.name == round.name
        });
        if taken {
            return Err(ExperienceStoreError::conflict(format!(
                "a round named {} already exists for this interview",
                round.name
            )));
        }
        Ok(())
    }

    fn apply(&mut self, op: StoreOp) -> Result<(), ExperienceStoreError> {
        match op {
            StoreOp::RequireVerification {
                interview_id,
                allowed,
            } => {
                let status = self
                    .interviews
                    .get(&interview_id)
                    .map(|interview| interview.verification.status)
                    .ok_or_else(|| missing("interview", interview_id))?;
                if !allowed.contains(&status) {
                    return Err(ExperienceStoreError::conflict(format!(
                        "interview {interview_id} is {status}"
                    )));
                }
            }
            StoreOp::InsertInterview(interview) => {
                if !self.users.contains_key(&interview.interviewee) {
                    return Err(ExperienceStoreError::conflict(
                        "interviewee does not exist",
                    ));
                }
                self.interviews.insert(interview.id, interview);
            }
            StoreOp::InsertRound(round) => {
                if !self.interviews.contains_key(&round.interview_id) {
                    return Err(missing("interview", round.interview_id));
                }
                self.ensure_round_name_free(&round)?;
                self.rounds.insert(round.id, round);
            }
            StoreOp::InsertQuestion(question) => {
                if !self.rounds.contains_key(&question.round_id) {
                    return Err(missing("round", question.round_id));
                }
                self.questions.insert(question.id, question);
            }
            StoreOp::UpdateInterview { id, changes } => self.update_interview(id, changes)?,
            StoreOp::UpdateRound { id, changes } => self.update_round(id, changes)?,
            StoreOp::UpdateQuestion { id, changes } => self.update_question(id, changes)?,
            StoreOp::Propagate(propagation) => self.propagate(propagation),
            StoreOp::LinkRound {
                interview_id,
                round_id,
            } => {
                let interview = self
                    .interviews
                    .get_mut(&interview_id)
                    .ok_or_else(|| missing("interview", interview_id))?;
                if !interview.round_ids.contains(&round_id) {
                    interview.round_ids.push(round_id);
                }
            }
            StoreOp::UnlinkRound {
                interview_id,
                round_id,
            } => {
                if let Some(interview) = self.interviews.get_mut(&interview_id) {
                    interview.round_ids.retain(|id| *id != round_id);
                }
            }
            StoreOp::LinkQuestion {
                round_id,
                question_id,
            } => {
                let round = self
                    .rounds
                    .get_mut(&round_id)
                    .ok_or_else(|| missing("round", round_id))?;
                if !round.question_ids.contains(&question_id) {
                    round.question_ids.push(question_id);
                }
            }
            StoreOp::UnlinkQuestion {
                round_id,
                question_id,
            } => {
                if let Some(round) = self.rounds.get_mut(&round_id) {
                    round.question_ids.retain(|id| *id != question_id);
                }
            }
            StoreOp::DeleteQuestions(selection) => {
                self.questions.retain(|_, question| match selection {
                    QuestionSelection::One(id) => question.id != id,
                    QuestionSelection::OfRound(id) => question.round_id != id,
                    QuestionSelection::OfInterview(id) => question.interview_id != id,
                });
            }
            StoreOp::DeleteRounds(selection) => {
                self.rounds.retain(|_, round| match selection {
                    RoundSelection::One(id) => round.id != id,
                    RoundSelection::OfInterview(id) => round.interview_id != id,
                });
            }
            StoreOp::DeleteInterview(id) => {
                self.interviews
                    .remove(&id)
                    .ok_or_else(|| missing("interview", id))?;
            }
        }
        Ok(())
    }

    fn update_interview(
        &mut self,
        id: Uuid,
        changes: InterviewChanges,
    ) -> Result<(), ExperienceStoreError> {
        let interview = self
            .interviews
            .get_mut(&id)
            .ok_or_else(|| missing("interview", id))?;
        if let Some(company) = changes.company {
            interview.company = company;
        }
        if let Some(status) = changes.status {
            interview.status = status;
        }
        if let Some(offer) = changes.offer {
            interview.offer = Some(offer);
        }
        if let Some(compensation) = changes.compensation {
            interview.compensation = Some(compensation);
        }
        if let Some(verification) = changes.verification {
            interview.verification = verification;
        }
        if let Some(poster) = changes.poster {
            interview.poster = Some(poster);
        }
        Ok(())
    }

    fn update_round(
        &mut self,
        id: Uuid,
        changes: RoundChanges,
    ) -> Result<(), ExperienceStoreError> {
        let mut round = self
            .rounds
            .get(&id)
            .cloned()
            .ok_or_else(|| missing("round", id))?;
        if let Some(name) = changes.name {
            round.name = name;
            self.ensure_round_name_free(&round)?;
        }
        if let Some(round_type) = changes.round_type {
            round.round_type = round_type;
        }
        if let Some(date) = changes.date {
            round.date = Some(date);
        }
        if let Some(note) = changes.note {
            round.note = Some(note);
        }
        self.rounds.insert(id, round);
        Ok(())
    }

    fn update_question(
        &mut self,
        id: Uuid,
        changes: QuestionChanges,
    ) -> Result<(), ExperienceStoreError> {
        let question = self
            .questions
            .get_mut(&id)
            .ok_or_else(|| missing("question", id))?;
        if let Some(title) = changes.title {
            question.title = title;
        }
        if let Some(description) = changes.description {
            question.description = Some(description);
        }
        if let Some(link) = changes.link {
            question.link = Some(link);
        }
        Ok(())
    }

    fn propagate(&mut self, propagation: Propagation) {
        match propagation {
            Propagation::QuestionCompany {
                interview_id,
                company,
            } => self
                .questions
                .values_mut()
                .filter(|question| question.interview_id == interview_id)
                .for_each(|question| question.company = company.clone()),
            Propagation::QuestionRoundType {
                round_id,
                round_type,
            } => self
                .questions
                .values_mut()
                .filter(|question| question.round_id == round_id)
                .for_each(|question| question.round_type = round_type),
        }
    }

    fn view(&self, interview: &Interview) -> InterviewView {
        let rounds = interview
            .round_ids
            .iter()
            .filter_map(|id| self.rounds.get(id))
            .map(|round| RoundView {
                round: round.clone(),
                questions: round
                    .question_ids
                    .iter()
                    .filter_map(|id| self.questions.get(id))
                    .cloned()
                    .collect(),
            })
            .collect();
        InterviewView {
            interview: interview.clone(),
            interviewee: self
                .users
                .get(&interview.interviewee)
                .map(User::summary),
            rounds,
        }
    }

    fn ensure_unique_user(&self, user: &User) -> Result<(), UserPersistenceError> {
        for other in self.users.values().filter(|other| other.id != user.id) {
            if other.reg_no == user.reg_no {
                return Err(UserPersistenceError::duplicate("registration number"));
            }
            if other.email == user.email {
                return Err(UserPersistenceError::duplicate("email"));
            }
        }
        Ok(())
    }

    /// Remove a user together with everything they own.
    fn delete_user(&mut self, id: &UserId) -> bool {
        if self.users.remove(id).is_none() {
            return false;
        }
        self.interviews.retain(|_, interview| interview.interviewee != *id);
        self.rounds.retain(|_, round| round.interviewee != *id);
        self.questions.retain(|_, question| question.interviewee != *id);
        true
    }
}

#[async_trait]
impl ExperienceStore for MemoryStore {
    async fn commit(&self, plan: WritePlan) -> Result<(), ExperienceStoreError> {
        let mut state = self.experience_state()?;
        let mut draft = state.clone();
        for op in plan.into_ops() {
            draft.apply(op)?;
        }
        *state = draft;
        Ok(())
    }

    async fn find_interview(&self, id: &Uuid) -> Result<Option<Interview>, ExperienceStoreError> {
        Ok(self.experience_state()?.interviews.get(id).cloned())
    }

    async fn find_round(&self, id: &Uuid) -> Result<Option<Round>, ExperienceStoreError> {
        Ok(self.experience_state()?.rounds.get(id).cloned())
    }

    async fn find_question(&self, id: &Uuid) -> Result<Option<Question>, ExperienceStoreError> {
        Ok(self.experience_state()?.questions.get(id).cloned())
    }

    async fn load_interview_view(
        &self,
        id: &Uuid,
    ) -> Result<Option<InterviewView>, ExperienceStoreError> {
        let state = self.experience_state()?;
        Ok(state.interviews.get(id).map(|interview| state.view(interview)))
    }

    async fn list_interviews(
        &self,
        query: &InterviewListQuery,
    ) -> Result<Page<InterviewListing>, ExperienceStoreError> {
        let state = self.experience_state()?;
        let mut matching: Vec<&Interview> = state
            .interviews
            .values()
            .filter(|interview| query.matches(interview))
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        let listings = matching
            .into_iter()
            .map(|interview| InterviewListing {
                interview: interview.clone(),
                interviewee: state.users.get(&interview.interviewee).map(User::summary),
            })
            .collect();
        Ok(page_of(listings, query.page))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.user_state()?.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let state = self.user_state()?;
        Ok(state.users.values().find(|user| &user.email == email).cloned())
    }

    async fn find_by_reg_no(&self, reg_no: &RegNo) -> Result<Option<User>, UserPersistenceError> {
        let state = self.user_state()?;
        Ok(state
            .users
            .values()
            .find(|user| &user.reg_no == reg_no)
            .cloned())
    }

    async fn find_by_reset_token(
        &self,
        digest: &ResetTokenDigest,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self.user_state()?;
        Ok(state
            .users
            .values()
            .find(|user| {
                user.reset_token.as_ref() == Some(digest)
                    && user.reset_expires_at.is_some_and(|expires| expires > now)
            })
            .cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.user_state()?;
        if state.users.contains_key(&user.id) {
            return Err(UserPersistenceError::duplicate("id"));
        }
        state.ensure_unique_user(user)?;
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.user_state()?;
        if !state.users.contains_key(&user.id) {
            return Err(UserPersistenceError::query(format!(
                "user {} not found",
                user.id
            )));
        }
        state.ensure_unique_user(user)?;
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        Ok(self.user_state()?.delete_user(id))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<User>, UserPersistenceError> {
        let state = self.user_state()?;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| a.reg_no.as_ref().cmp(b.reg_no.as_ref()));
        Ok(page_of(users, page))
    }
}
