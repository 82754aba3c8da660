//! Verification workflow.
//!
//! `not-verified -> in-queue` and `rejected -> in-queue` happen through owner
//! submissions in [`super::ExperienceService`]. This service owns the
//! privileged `in-queue -> accepted | rejected` transitions and notifies the
//! owner once a transition has committed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use super::experience_service::map_store_error;
use crate::domain::ports::{
    ExperienceStore, Notification, Notifier, Recipient, RejectInterviewRequest, UserRepository,
    VerificationCommand,
};
use crate::domain::{
    AWAITING_DECISION, Caller, Capability, Error, Interview, InterviewChanges, InterviewFilter, InterviewListQuery,
    InterviewListing, InterviewView, ListScope, Page, PageRequest, VERIFIERS, Verification,
    VerificationStatus, WritePlan, authorize,
};

/// Service implementing [`VerificationCommand`].
#[derive(Clone)]
pub struct VerificationService<S, U, N: ?Sized> {
    store: Arc<S>,
    users: Arc<U>,
    notifier: Arc<N>,
}

impl<S, U, N: ?Sized> VerificationService<S, U, N> {
    pub fn new(store: Arc<S>, users: Arc<U>, notifier: Arc<N>) -> Self {
        Self {
            store,
            users,
            notifier,
        }
    }
}

impl<S, U, N: ?Sized> VerificationService<S, U, N>
where
    S: ExperienceStore,
    U: UserRepository,
    N: Notifier,
{
    async fn transition(
        &self,
        caller: &Caller,
        interview_id: Uuid,
        target: Verification,
    ) -> Result<(Interview, InterviewView), Error> {
        authorize(caller, Capability::Role(VERIFIERS))?;
        let interview = self
            .store
            .find_interview(&interview_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("interview {interview_id} not found")))?;

        let current = interview.verification.status;
        if current != VerificationStatus::InQueue {
            return Err(Error::conflict(format!(
                "cannot move an interview from {current} to {}",
                target.status
            )));
        }

        let plan = WritePlan::update_interview(
            &interview,
            InterviewChanges {
                verification: Some(target),
                ..Default::default()
            },
        )
        .require_verification(interview_id, AWAITING_DECISION);
        self.store.commit(plan).await.map_err(map_store_error)?;

        let view = self
            .store
            .load_interview_view(&interview_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("interview {interview_id} not found")))?;
        Ok((interview, view))
    }

    /// Best-effort owner notification. Failures never undo the transition.
    async fn notify_owner(&self, interview: &Interview, notification: Notification) {
        let owner = match self.users.find_by_id(&interview.interviewee).await {
            Ok(Some(owner)) => owner,
            Ok(None) => {
                warn!(interview_id = %interview.id, "interview owner no longer exists");
                return;
            }
            Err(error) => {
                warn!(interview_id = %interview.id, %error, "failed to load interview owner");
                return;
            }
        };
        let recipient = Recipient::from(&owner);
        if let Err(error) = self.notifier.send(&recipient, &notification).await {
            warn!(
                interview_id = %interview.id,
                user_id = %owner.id,
                %error,
                "verification notification failed"
            );
        }
    }
}

#[async_trait]
impl<S, U, N: ?Sized> VerificationCommand for VerificationService<S, U, N>
where
    S: ExperienceStore,
    U: UserRepository,
    N: Notifier,
{
    async fn accept(&self, caller: Caller, interview_id: Uuid) -> Result<InterviewView, Error> {
        let target = Verification {
            status: VerificationStatus::Accepted,
            faults: Vec::new(),
        };
        let (interview, view) = self.transition(&caller, interview_id, target).await?;
        self.notify_owner(
            &interview,
            Notification::ExperienceAccepted {
                interview_id,
                company: interview.company.to_string(),
            },
        )
        .await;
        Ok(view)
    }

    async fn reject(&self, request: RejectInterviewRequest) -> Result<InterviewView, Error> {
        let faults: Vec<String> = request
            .faults
            .into_iter()
            .map(|fault| fault.trim().to_owned())
            .filter(|fault| !fault.is_empty())
            .collect();
        let target = Verification {
            status: VerificationStatus::Rejected,
            faults: faults.clone(),
        };
        let (interview, view) = self
            .transition(&request.caller, request.interview_id, target)
            .await?;
        self.notify_owner(
            &interview,
            Notification::ExperienceRejected {
                interview_id: request.interview_id,
                company: interview.company.to_string(),
                faults,
            },
        )
        .await;
        Ok(view)
    }

    async fn queue(
        &self,
        caller: Caller,
        page: PageRequest,
    ) -> Result<Page<InterviewListing>, Error> {
        authorize(&caller, Capability::Role(VERIFIERS))?;
        let query = InterviewListQuery {
            scope: ListScope::VerificationQueue,
            filter: InterviewFilter::default(),
            page,
        };
        self.store
            .list_interviews(&query)
            .await
            .map_err(map_store_error)
    }
}

#[cfg(test)]
#[path = "verification_service_tests.rs"]
mod tests;
