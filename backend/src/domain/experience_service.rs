//! Experience aggregate service.
//!
//! Implements the owner-facing command and public query ports. Each mutation
//! checks existence, ownership and editability before it builds a
//! [`WritePlan`], then commits the plan in one unit of work.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::{
    CreateInterviewRequest, CreateQuestionRequest, CreateRoundRequest, ExperienceCommand,
    ExperienceQuery, ExperienceStore, ExperienceStoreError, UpdateInterviewRequest,
    UpdateQuestionRequest, UpdateRoundRequest,
};
use crate::domain::{
    Caller, Capability, EDITABLE, Error, Interview, InterviewChanges, InterviewFilter, InterviewListQuery,
    InterviewListing, InterviewView, ListScope, Page, PageRequest, Question, Round, RoundView,
    UserId, Verification, WritePlan, authorize,
};

/// Map store failures onto API errors.
pub(crate) fn map_store_error(error: ExperienceStoreError) -> Error {
    match error {
        ExperienceStoreError::Connection { message } => {
            Error::service_unavailable(format!("experience store unavailable: {message}"))
        }
        ExperienceStoreError::Query { message } => {
            Error::internal(format!("experience store error: {message}"))
        }
        ExperienceStoreError::Conflict { message } => Error::conflict(message),
        ExperienceStoreError::MissingRecord { message } => Error::not_found(message),
    }
}

/// Refuse owner edits once an interview has been accepted.
pub(crate) fn ensure_editable(interview: &Interview) -> Result<(), Error> {
    if interview.verification.is_accepted() {
        return Err(Error::forbidden(
            "accepted experiences can no longer be edited",
        ));
    }
    Ok(())
}

/// Experience service implementing the owner command and query ports.
#[derive(Clone)]
pub struct ExperienceService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> ExperienceService<S> {
    /// Create a new service over `store`.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use experience_backend::domain::ExperienceService;
    /// # use experience_backend::outbound::memory::MemoryStore;
    /// let service = ExperienceService::new(Arc::new(MemoryStore::default()), Arc::new(DefaultClock));
    /// # let _ = service;
    /// ```
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

impl<S> ExperienceService<S>
where
    S: ExperienceStore,
{
    async fn interview(&self, id: Uuid) -> Result<Interview, Error> {
        self.store
            .find_interview(&id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("interview {id} not found")))
    }

    async fn round(&self, id: Uuid) -> Result<Round, Error> {
        self.store
            .find_round(&id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("round {id} not found")))
    }

    async fn question(&self, id: Uuid) -> Result<Question, Error> {
        self.store
            .find_question(&id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("question {id} not found")))
    }

    async fn view(&self, id: Uuid) -> Result<InterviewView, Error> {
        self.store
            .load_interview_view(&id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("interview {id} not found")))
    }

    async fn round_view(&self, interview_id: Uuid, round_id: Uuid) -> Result<RoundView, Error> {
        self.view(interview_id)
            .await?
            .rounds
            .into_iter()
            .find(|view| view.round.id == round_id)
            .ok_or_else(|| Error::not_found(format!("round {round_id} not found")))
    }

    async fn commit(&self, plan: WritePlan) -> Result<(), Error> {
        if plan.is_empty() {
            return Ok(());
        }
        self.store.commit(plan).await.map_err(map_store_error)
    }

    /// Commit an owner edit, re-checking editability inside the commit so an
    /// acceptance that lands first wins.
    async fn commit_edit(&self, interview_id: Uuid, plan: WritePlan) -> Result<(), Error> {
        if plan.is_empty() {
            return Ok(());
        }
        self.commit(plan.require_verification(interview_id, EDITABLE))
            .await
    }

    /// Load the interview owning a child and check the caller may edit it.
    async fn editable_parent(
        &self,
        caller: &Caller,
        owner: &UserId,
        interview_id: Uuid,
    ) -> Result<Interview, Error> {
        authorize(caller, Capability::Own(owner))?;
        let interview = self.interview(interview_id).await?;
        ensure_editable(&interview)?;
        Ok(interview)
    }

    async fn list(
        &self,
        scope: ListScope,
        filter: InterviewFilter,
        page: PageRequest,
    ) -> Result<Page<InterviewListing>, Error> {
        let query = InterviewListQuery {
            scope,
            filter,
            page,
        };
        self.store
            .list_interviews(&query)
            .await
            .map_err(map_store_error)
    }
}

#[async_trait]
impl<S> ExperienceCommand for ExperienceService<S>
where
    S: ExperienceStore,
{
    async fn create_interview(
        &self,
        request: CreateInterviewRequest,
    ) -> Result<InterviewView, Error> {
        let (id, plan) =
            WritePlan::create_interview(request.caller.id, request.draft, self.clock.utc());
        self.commit(plan).await?;
        self.view(id).await
    }

    async fn update_interview(
        &self,
        request: UpdateInterviewRequest,
    ) -> Result<InterviewView, Error> {
        let interview = self.interview(request.interview_id).await?;
        authorize(&request.caller, Capability::Own(&interview.interviewee))?;
        ensure_editable(&interview)?;

        let edit = request.edit;
        let changes = InterviewChanges {
            company: edit.company,
            status: edit.status,
            offer: edit.offer,
            compensation: edit.compensation,
            verification: edit.submit.then(Verification::queued),
            poster: None,
        };
        self.commit_edit(interview.id, WritePlan::update_interview(&interview, changes))
            .await?;
        self.view(interview.id).await
    }

    async fn delete_interview(&self, caller: Caller, interview_id: Uuid) -> Result<(), Error> {
        let interview = self.interview(interview_id).await?;
        authorize(&caller, Capability::Own(&interview.interviewee))?;
        self.commit(WritePlan::delete_interview(&interview)).await
    }

    async fn create_round(&self, request: CreateRoundRequest) -> Result<RoundView, Error> {
        let interview = self.interview(request.interview_id).await?;
        authorize(&request.caller, Capability::Own(&interview.interviewee))?;
        ensure_editable(&interview)?;

        let (round_id, plan) =
            WritePlan::create_round(&interview, request.draft, self.clock.utc());
        self.commit_edit(interview.id, plan).await?;
        self.round_view(interview.id, round_id).await
    }

    async fn update_round(&self, request: UpdateRoundRequest) -> Result<RoundView, Error> {
        let round = self.round(request.round_id).await?;
        self.editable_parent(&request.caller, &round.interviewee, round.interview_id)
            .await?;

        self.commit_edit(round.interview_id, WritePlan::update_round(&round, request.changes))
            .await?;
        self.round_view(round.interview_id, round.id).await
    }

    async fn delete_round(&self, caller: Caller, round_id: Uuid) -> Result<(), Error> {
        let round = self.round(round_id).await?;
        self.editable_parent(&caller, &round.interviewee, round.interview_id)
            .await?;
        self.commit_edit(round.interview_id, WritePlan::delete_round(&round))
            .await
    }

    async fn create_question(&self, request: CreateQuestionRequest) -> Result<Question, Error> {
        let interview = self.interview(request.interview_id).await?;
        authorize(&request.caller, Capability::Own(&interview.interviewee))?;
        ensure_editable(&interview)?;
        let round = self.round(request.round_id).await?;
        if round.interview_id != interview.id {
            return Err(Error::forbidden(
                "round does not belong to the given interview",
            ));
        }

        let (question_id, plan) =
            WritePlan::create_question(&interview, &round, request.draft, self.clock.utc());
        self.commit_edit(interview.id, plan).await?;
        self.question(question_id).await
    }

    async fn update_question(&self, request: UpdateQuestionRequest) -> Result<Question, Error> {
        let question = self.question(request.question_id).await?;
        self.editable_parent(&request.caller, &question.interviewee, question.interview_id)
            .await?;

        self.commit_edit(
            question.interview_id,
            WritePlan::update_question(&question, request.changes),
        )
        .await?;
        self.question(question.id).await
    }

    async fn delete_question(&self, caller: Caller, question_id: Uuid) -> Result<(), Error> {
        let question = self.question(question_id).await?;
        self.editable_parent(&caller, &question.interviewee, question.interview_id)
            .await?;
        self.commit_edit(question.interview_id, WritePlan::delete_question(&question))
            .await
    }
}

#[async_trait]
impl<S> ExperienceQuery for ExperienceService<S>
where
    S: ExperienceStore,
{
    async fn get_interview(&self, interview_id: Uuid) -> Result<InterviewView, Error> {
        self.view(interview_id).await
    }

    async fn list_accepted(
        &self,
        filter: InterviewFilter,
        page: PageRequest,
    ) -> Result<Page<InterviewListing>, Error> {
        self.list(ListScope::Accepted, filter, page).await
    }

    async fn list_owned(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> Result<Page<InterviewListing>, Error> {
        self.list(ListScope::Owner(owner), InterviewFilter::default(), page)
            .await
    }
}

#[cfg(test)]
#[path = "experience_service_tests.rs"]
mod tests;
