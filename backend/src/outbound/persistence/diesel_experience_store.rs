//! PostgreSQL-backed `ExperienceStore`.
//!
//! A [`WritePlan`] is applied operation by operation inside one transaction,
//! so either the whole plan lands or nothing does. Child id lists are
//! rewritten under `SELECT ... FOR UPDATE` to keep concurrent link and unlink
//! operations from losing entries.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{ExperienceStore, ExperienceStoreError};
use crate::domain::{
    CompanyName, Compensation, ExperienceValidationError, Interview, InterviewChanges,
    InterviewListQuery, InterviewListing, InterviewView, ListScope, Page, Propagation, Question,
    QuestionChanges, QuestionDescription, QuestionLink, QuestionSelection, QuestionTitle, Round,
    RoundChanges, RoundName, RoundNote, RoundSelection, RoundView, StoreOp, UserId, UserSummary,
    Verification, VerificationStatus, WritePlan,
};

use super::error_mapping::{DbFailure, classify_diesel_error, classify_pool_error};
use super::models::{
    InterviewChangeset, InterviewRow, QuestionChangeset, QuestionRow, RoundChangeset, RoundRow,
    UserRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{interviews, questions, rounds, users};

const ROUND_NAME_CONSTRAINT: &str = "rounds_name_interview_key";

/// Diesel implementation of the [`ExperienceStore`] port.
#[derive(Clone)]
pub struct DieselExperienceStore {
    pool: DbPool,
}

impl DieselExperienceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_store_error(failure: DbFailure) -> ExperienceStoreError {
    match failure {
        DbFailure::Connection(message) => ExperienceStoreError::connection(message),
        DbFailure::Conflict { constraint, message } => {
            if constraint.as_deref() == Some(ROUND_NAME_CONSTRAINT) {
                ExperienceStoreError::conflict("a round with this name already exists")
            } else {
                ExperienceStoreError::conflict(message)
            }
        }
        DbFailure::Query(message) => ExperienceStoreError::query(message),
    }
}

fn map_pool_error(error: PoolError) -> ExperienceStoreError {
    to_store_error(classify_pool_error(error))
}

fn map_diesel_error(error: diesel::result::Error) -> ExperienceStoreError {
    to_store_error(classify_diesel_error(error))
}

/// Error raised inside a commit transaction.
#[derive(Debug)]
enum CommitError {
    Database(diesel::result::Error),
    Store(ExperienceStoreError),
}

impl From<diesel::result::Error> for CommitError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Database(error)
    }
}

impl From<CommitError> for ExperienceStoreError {
    fn from(error: CommitError) -> Self {
        match error {
            CommitError::Database(error) => map_diesel_error(error),
            CommitError::Store(error) => error,
        }
    }
}

fn missing(kind: &str, id: Uuid) -> CommitError {
    CommitError::Store(ExperienceStoreError::missing_record(format!(
        "{kind} {id} not found"
    )))
}

fn ensure_updated(rows: usize, kind: &str, id: Uuid) -> Result<(), CommitError> {
    if rows == 0 {
        return Err(missing(kind, id));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Row conversion
// ---------------------------------------------------------------------------

fn corrupt(kind: &str, id: Uuid) -> impl Fn(ExperienceValidationError) -> ExperienceStoreError {
    let context = format!("stored {kind} {id} is invalid");
    move |error| ExperienceStoreError::query(format!("{context}: {error}"))
}

fn row_to_interview(row: InterviewRow) -> Result<Interview, ExperienceStoreError> {
    let invalid = corrupt("interview", row.id);
    Ok(Interview {
        id: row.id,
        interviewee: UserId::from_uuid(row.interviewee),
        company: CompanyName::new(&row.company).map_err(&invalid)?,
        round_ids: row.round_ids,
        status: row.status.parse().map_err(&invalid)?,
        verification: Verification {
            status: row.verification_status.parse().map_err(&invalid)?,
            faults: row.verification_faults,
        },
        offer: row
            .offer
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(&invalid)?,
        compensation: row
            .compensation
            .map(Compensation::new)
            .transpose()
            .map_err(&invalid)?,
        poster: row.poster,
        created_at: row.created_at,
    })
}

fn interview_to_row(interview: &Interview) -> InterviewRow {
    InterviewRow {
        id: interview.id,
        interviewee: *interview.interviewee.as_uuid(),
        company: interview.company.as_ref().to_owned(),
        round_ids: interview.round_ids.clone(),
        status: interview.status.as_str().to_owned(),
        verification_status: interview.verification.status.as_str().to_owned(),
        verification_faults: interview.verification.faults.clone(),
        offer: interview.offer.map(|offer| offer.as_str().to_owned()),
        compensation: interview.compensation.map(Compensation::amount),
        poster: interview.poster.clone(),
        created_at: interview.created_at,
    }
}

fn row_to_round(row: RoundRow) -> Result<Round, ExperienceStoreError> {
    let invalid = corrupt("round", row.id);
    Ok(Round {
        id: row.id,
        interview_id: row.interview_id,
        interviewee: UserId::from_uuid(row.interviewee),
        name: RoundName::new(&row.name).map_err(&invalid)?,
        round_type: row.round_type.parse().map_err(&invalid)?,
        date: row.date,
        note: row.note.map(RoundNote::new).transpose().map_err(&invalid)?,
        question_ids: row.question_ids,
        created_at: row.created_at,
    })
}

fn round_to_row(round: &Round) -> RoundRow {
    RoundRow {
        id: round.id,
        interview_id: round.interview_id,
        interviewee: *round.interviewee.as_uuid(),
        name: round.name.as_ref().to_owned(),
        round_type: round.round_type.as_str().to_owned(),
        date: round.date,
        note: round.note.as_ref().map(|note| note.as_ref().to_owned()),
        question_ids: round.question_ids.clone(),
        created_at: round.created_at,
    }
}

fn row_to_question(row: QuestionRow) -> Result<Question, ExperienceStoreError> {
    let invalid = corrupt("question", row.id);
    Ok(Question {
        id: row.id,
        round_id: row.round_id,
        interview_id: row.interview_id,
        interviewee: UserId::from_uuid(row.interviewee),
        company: CompanyName::new(&row.company).map_err(&invalid)?,
        round_type: row.round_type.parse().map_err(&invalid)?,
        title: QuestionTitle::new(&row.title).map_err(&invalid)?,
        description: row
            .description
            .map(QuestionDescription::new)
            .transpose()
            .map_err(&invalid)?,
        link: row
            .link
            .as_deref()
            .map(QuestionLink::new)
            .transpose()
            .map_err(&invalid)?,
        created_at: row.created_at,
    })
}

fn question_to_row(question: &Question) -> QuestionRow {
    QuestionRow {
        id: question.id,
        round_id: question.round_id,
        interview_id: question.interview_id,
        interviewee: *question.interviewee.as_uuid(),
        company: question.company.as_ref().to_owned(),
        round_type: question.round_type.as_str().to_owned(),
        title: question.title.as_ref().to_owned(),
        description: question
            .description
            .as_ref()
            .map(|text| text.as_ref().to_owned()),
        link: question.link.as_ref().map(|link| link.as_str().to_owned()),
        created_at: question.created_at,
    }
}

fn summary_of(row: &UserRow) -> UserSummary {
    UserSummary {
        name: row.name.clone(),
        reg_no: row.reg_no.clone(),
        batch: row.batch,
    }
}

// ---------------------------------------------------------------------------
// Plan application
// ---------------------------------------------------------------------------

async fn update_interview(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    changes: &InterviewChanges,
) -> Result<(), CommitError> {
    let changeset = InterviewChangeset {
        company: changes.company.as_ref().map(AsRef::as_ref),
        status: changes.status.map(|status| status.as_str()),
        verification_status: changes
            .verification
            .as_ref()
            .map(|verification| verification.status.as_str()),
        verification_faults: changes
            .verification
            .as_ref()
            .map(|verification| verification.faults.as_slice()),
        offer: changes.offer.map(|offer| offer.as_str()),
        compensation: changes.compensation.map(Compensation::amount),
        poster: changes.poster.as_deref(),
    };
    let rows = diesel::update(interviews::table.find(id))
        .set(&changeset)
        .execute(conn)
        .await?;
    ensure_updated(rows, "interview", id)
}

async fn update_round(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    changes: &RoundChanges,
) -> Result<(), CommitError> {
    let changeset = RoundChangeset {
        name: changes.name.as_ref().map(AsRef::as_ref),
        round_type: changes.round_type.map(|round_type| round_type.as_str()),
        date: changes.date,
        note: changes.note.as_ref().map(AsRef::as_ref),
    };
    let rows = diesel::update(rounds::table.find(id))
        .set(&changeset)
        .execute(conn)
        .await?;
    ensure_updated(rows, "round", id)
}

async fn update_question(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    changes: &QuestionChanges,
) -> Result<(), CommitError> {
    let changeset = QuestionChangeset {
        title: changes.title.as_ref().map(AsRef::as_ref),
        description: changes.description.as_ref().map(AsRef::as_ref),
        link: changes.link.as_ref().map(QuestionLink::as_str),
    };
    let rows = diesel::update(questions::table.find(id))
        .set(&changeset)
        .execute(conn)
        .await?;
    ensure_updated(rows, "question", id)
}

async fn propagate(
    conn: &mut AsyncPgConnection,
    propagation: &Propagation,
) -> Result<(), CommitError> {
    match propagation {
        Propagation::QuestionCompany {
            interview_id,
            company,
        } => {
            diesel::update(questions::table.filter(questions::interview_id.eq(*interview_id)))
                .set(questions::company.eq(company.as_ref()))
                .execute(conn)
                .await?;
        }
        Propagation::QuestionRoundType {
            round_id,
            round_type,
        } => {
            diesel::update(questions::table.filter(questions::round_id.eq(*round_id)))
                .set(questions::round_type.eq(round_type.as_str()))
                .execute(conn)
                .await?;
        }
    }
    Ok(())
}

/// How a child id list changes.
#[derive(Debug, Clone, Copy)]
enum ListEdit {
    Append(Uuid),
    Remove(Uuid),
}

impl ListEdit {
    fn apply(self, ids: &mut Vec<Uuid>) {
        match self {
            Self::Append(id) if !ids.contains(&id) => ids.push(id),
            Self::Append(_) => {}
            Self::Remove(id) => ids.retain(|existing| *existing != id),
        }
    }
}

async fn edit_round_ids(
    conn: &mut AsyncPgConnection,
    interview_id: Uuid,
    edit: ListEdit,
) -> Result<(), CommitError> {
    let mut ids: Vec<Uuid> = interviews::table
        .find(interview_id)
        .select(interviews::round_ids)
        .for_update()
        .first(conn)
        .await
        .optional()?
        .ok_or_else(|| missing("interview", interview_id))?;
    edit.apply(&mut ids);
    diesel::update(interviews::table.find(interview_id))
        .set(interviews::round_ids.eq(ids))
        .execute(conn)
        .await?;
    Ok(())
}

async fn edit_question_ids(
    conn: &mut AsyncPgConnection,
    round_id: Uuid,
    edit: ListEdit,
) -> Result<(), CommitError> {
    let mut ids: Vec<Uuid> = rounds::table
        .find(round_id)
        .select(rounds::question_ids)
        .for_update()
        .first(conn)
        .await
        .optional()?
        .ok_or_else(|| missing("round", round_id))?;
    edit.apply(&mut ids);
    diesel::update(rounds::table.find(round_id))
        .set(rounds::question_ids.eq(ids))
        .execute(conn)
        .await?;
    Ok(())
}

async fn delete_questions(
    conn: &mut AsyncPgConnection,
    selection: QuestionSelection,
) -> Result<(), CommitError> {
    match selection {
        QuestionSelection::One(id) => {
            diesel::delete(questions::table.find(id))
                .execute(conn)
                .await?
        }
        QuestionSelection::OfRound(round_id) => {
            diesel::delete(questions::table.filter(questions::round_id.eq(round_id)))
                .execute(conn)
                .await?
        }
        QuestionSelection::OfInterview(interview_id) => {
            diesel::delete(questions::table.filter(questions::interview_id.eq(interview_id)))
                .execute(conn)
                .await?
        }
    };
    Ok(())
}

async fn delete_rounds(
    conn: &mut AsyncPgConnection,
    selection: RoundSelection,
) -> Result<(), CommitError> {
    match selection {
        RoundSelection::One(id) => diesel::delete(rounds::table.find(id)).execute(conn).await?,
        RoundSelection::OfInterview(interview_id) => {
            diesel::delete(rounds::table.filter(rounds::interview_id.eq(interview_id)))
                .execute(conn)
                .await?
        }
    };
    Ok(())
}

/// Lock the interview row and check its verification status.
///
/// The row lock holds until the transaction ends, so a concurrent plan
/// guarded on the same interview waits and then sees this plan's outcome.
async fn require_verification(
    conn: &mut AsyncPgConnection,
    interview_id: Uuid,
    allowed: &[VerificationStatus],
) -> Result<(), CommitError> {
    let stored: String = interviews::table
        .find(interview_id)
        .select(interviews::verification_status)
        .for_update()
        .first(conn)
        .await
        .optional()?
        .ok_or_else(|| missing("interview", interview_id))?;
    check_verification(interview_id, &stored, allowed).map_err(CommitError::Store)
}

fn check_verification(
    interview_id: Uuid,
    stored: &str,
    allowed: &[VerificationStatus],
) -> Result<(), ExperienceStoreError> {
    let permitted = stored
        .parse::<VerificationStatus>()
        .is_ok_and(|status| allowed.contains(&status));
    if !permitted {
        return Err(ExperienceStoreError::conflict(format!(
            "interview {interview_id} is {stored}"
        )));
    }
    Ok(())
}

async fn apply_op(conn: &mut AsyncPgConnection, op: StoreOp) -> Result<(), CommitError> {
    match op {
        StoreOp::RequireVerification {
            interview_id,
            allowed,
        } => require_verification(conn, interview_id, allowed).await?,
        StoreOp::InsertInterview(interview) => {
            diesel::insert_into(interviews::table)
                .values(&interview_to_row(&interview))
                .execute(conn)
                .await?;
        }
        StoreOp::InsertRound(round) => {
            diesel::insert_into(rounds::table)
                .values(&round_to_row(&round))
                .execute(conn)
                .await?;
        }
        StoreOp::InsertQuestion(question) => {
            diesel::insert_into(questions::table)
                .values(&question_to_row(&question))
                .execute(conn)
                .await?;
        }
        StoreOp::UpdateInterview { id, changes } => update_interview(conn, id, &changes).await?,
        StoreOp::UpdateRound { id, changes } => update_round(conn, id, &changes).await?,
        StoreOp::UpdateQuestion { id, changes } => update_question(conn, id, &changes).await?,
        StoreOp::Propagate(propagation) => propagate(conn, &propagation).await?,
        StoreOp::LinkRound {
            interview_id,
            round_id,
        } => edit_round_ids(conn, interview_id, ListEdit::Append(round_id)).await?,
        StoreOp::UnlinkRound {
            interview_id,
            round_id,
        } => edit_round_ids(conn, interview_id, ListEdit::Remove(round_id)).await?,
        StoreOp::LinkQuestion {
            round_id,
            question_id,
        } => edit_question_ids(conn, round_id, ListEdit::Append(question_id)).await?,
        StoreOp::UnlinkQuestion {
            round_id,
            question_id,
        } => edit_question_ids(conn, round_id, ListEdit::Remove(question_id)).await?,
        StoreOp::DeleteQuestions(selection) => delete_questions(conn, selection).await?,
        StoreOp::DeleteRounds(selection) => delete_rounds(conn, selection).await?,
        StoreOp::DeleteInterview(id) => {
            let rows = diesel::delete(interviews::table.find(id))
                .execute(conn)
                .await?;
            ensure_updated(rows, "interview", id)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Apply the listing scope and filters to a boxed interviews query.
fn scoped<'a, ST>(
    mut boxed: interviews::BoxedQuery<'a, Pg, ST>,
    query: &InterviewListQuery,
) -> interviews::BoxedQuery<'a, Pg, ST> {
    boxed = match query.scope {
        ListScope::Accepted => boxed.filter(
            interviews::verification_status.eq(VerificationStatus::Accepted.as_str()),
        ),
        ListScope::Owner(owner) => boxed.filter(interviews::interviewee.eq(*owner.as_uuid())),
        ListScope::VerificationQueue => boxed.filter(
            interviews::verification_status.eq(VerificationStatus::InQueue.as_str()),
        ),
    };
    if let Some(company) = query.filter.company.as_deref() {
        boxed = boxed.filter(interviews::company.ilike(escape_like(company.trim())));
    }
    if let Some(status) = query.filter.status {
        boxed = boxed.filter(interviews::status.eq(status.as_str()));
    }
    if let Some(offer) = query.filter.offer {
        boxed = boxed.filter(interviews::offer.eq(offer.as_str()));
    }
    boxed
}

async fn load_summaries(
    conn: &mut AsyncPgConnection,
    ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, UserSummary>, diesel::result::Error> {
    let rows: Vec<UserRow> = users::table
        .filter(users::id.eq_any(ids))
        .select(UserRow::as_select())
        .load(conn)
        .await?;
    Ok(rows.iter().map(|row| (row.id, summary_of(row))).collect())
}

type ViewRows = (InterviewRow, Option<UserRow>, Vec<RoundRow>, Vec<QuestionRow>);

fn assemble_view(rows: ViewRows) -> Result<InterviewView, ExperienceStoreError> {
    let (interview_row, user_row, round_rows, question_rows) = rows;
    let interview = row_to_interview(interview_row)?;
    let mut rounds_by_id = round_rows
        .into_iter()
        .map(|row| row_to_round(row).map(|round| (round.id, round)))
        .collect::<Result<HashMap<_, _>, _>>()?;
    let mut questions_by_id = question_rows
        .into_iter()
        .map(|row| row_to_question(row).map(|question| (question.id, question)))
        .collect::<Result<HashMap<_, _>, _>>()?;

    let rounds = interview
        .round_ids
        .iter()
        .filter_map(|id| rounds_by_id.remove(id))
        .map(|round| RoundView {
            questions: round
                .question_ids
                .iter()
                .filter_map(|id| questions_by_id.remove(id))
                .collect(),
            round,
        })
        .collect();
    Ok(InterviewView {
        interviewee: user_row.as_ref().map(summary_of),
        interview,
        rounds,
    })
}

#[async_trait]
impl ExperienceStore for DieselExperienceStore {
    async fn commit(&self, plan: WritePlan) -> Result<(), ExperienceStoreError> {
        let ops = plan.into_ops();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                for op in ops {
                    apply_op(conn, op).await?;
                }
                Ok::<(), CommitError>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(ExperienceStoreError::from)
    }

    async fn find_interview(&self, id: &Uuid) -> Result<Option<Interview>, ExperienceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<InterviewRow> = interviews::table
            .find(*id)
            .select(InterviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_interview).transpose()
    }

    async fn find_round(&self, id: &Uuid) -> Result<Option<Round>, ExperienceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RoundRow> = rounds::table
            .find(*id)
            .select(RoundRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_round).transpose()
    }

    async fn find_question(&self, id: &Uuid) -> Result<Option<Question>, ExperienceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<QuestionRow> = questions::table
            .find(*id)
            .select(QuestionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_question).transpose()
    }

    async fn load_interview_view(
        &self,
        id: &Uuid,
    ) -> Result<Option<InterviewView>, ExperienceStoreError> {
        let id = *id;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // One transaction so the interview and its children come from one snapshot.
        let rows: Option<ViewRows> = conn
            .transaction(|conn| {
                async move {
                    let Some(interview) = interviews::table
                        .find(id)
                        .select(InterviewRow::as_select())
                        .first(conn)
                        .await
                        .optional()?
                    else {
                        return Ok(None);
                    };
                    let user = users::table
                        .find(interview.interviewee)
                        .select(UserRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;
                    let round_rows = rounds::table
                        .filter(rounds::interview_id.eq(id))
                        .select(RoundRow::as_select())
                        .load(conn)
                        .await?;
                    let question_rows = questions::table
                        .filter(questions::interview_id.eq(id))
                        .select(QuestionRow::as_select())
                        .load(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>(Some((
                        interview,
                        user,
                        round_rows,
                        question_rows,
                    )))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        rows.map(assemble_view).transpose()
    }

    async fn list_interviews(
        &self,
        query: &InterviewListQuery,
    ) -> Result<Page<InterviewListing>, ExperienceStoreError> {
        let offset = i64::try_from(query.page.offset())
            .map_err(|_| ExperienceStoreError::query("page offset exceeds i64 range"))?;
        let limit = i64::from(query.page.limit());
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = scoped(interviews::table.select(count_star()).into_boxed(), query)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<InterviewRow> = scoped(
            interviews::table
                .select(InterviewRow::as_select())
                .into_boxed(),
            query,
        )
        .order((interviews::created_at.desc(), interviews::id.desc()))
        .limit(limit)
        .offset(offset)
        .load(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        let owner_ids = rows.iter().map(|row| row.interviewee).collect();
        let summaries = load_summaries(&mut conn, owner_ids)
            .await
            .map_err(map_diesel_error)?;
        let listings = rows
            .into_iter()
            .map(|row| {
                let interviewee = summaries.get(&row.interviewee).cloned();
                row_to_interview(row).map(|interview| InterviewListing {
                    interview,
                    interviewee,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(
            listings,
            query.page,
            u64::try_from(total).unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::{AWAITING_DECISION, EDITABLE, Role, RoundType};
    use crate::test_support::{sample_interview, sample_question, sample_round, sample_user};

    #[rstest]
    fn round_name_clash_is_reported_plainly() {
        let error = to_store_error(DbFailure::Conflict {
            constraint: Some(ROUND_NAME_CONSTRAINT.to_owned()),
            message: "unique constraint violated".to_owned(),
        });
        assert_eq!(
            error,
            ExperienceStoreError::conflict("a round with this name already exists")
        );
    }

    #[rstest]
    #[case("50%_off", "50\\%\\_off")]
    #[case("C:\\dir", "C:\\\\dir")]
    #[case("Acme", "Acme")]
    fn company_filter_escapes_like_wildcards(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(escape_like(raw), expected);
    }

    #[rstest]
    #[case("in-queue", AWAITING_DECISION, true)]
    #[case("accepted", AWAITING_DECISION, false)]
    #[case("rejected", AWAITING_DECISION, false)]
    #[case("rejected", EDITABLE, true)]
    #[case("accepted", EDITABLE, false)]
    #[case("garbled", EDITABLE, false)]
    fn verification_guard_checks_the_locked_status(
        #[case] stored: &str,
        #[case] allowed: &[VerificationStatus],
        #[case] permitted: bool,
    ) {
        let result = check_verification(Uuid::new_v4(), stored, allowed);

        assert_eq!(result.is_ok(), permitted);
        if let Err(error) = result {
            assert!(matches!(error, ExperienceStoreError::Conflict { .. }));
        }
    }

    #[rstest]
    fn list_edits_keep_order_and_skip_duplicates() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut ids = vec![a];
        ListEdit::Append(b).apply(&mut ids);
        ListEdit::Append(a).apply(&mut ids);
        assert_eq!(ids, vec![a, b]);
        ListEdit::Remove(a).apply(&mut ids);
        assert_eq!(ids, vec![b]);
    }

    #[rstest]
    fn view_follows_stored_child_order() {
        let owner = sample_user(Role::User);
        let mut interview = sample_interview(owner.id, VerificationStatus::InQueue);
        let mut first = sample_round(&interview);
        let mut second = sample_round(&interview);
        second.name = RoundName::new("Tech 1").expect("round name");
        second.round_type = RoundType::Technical;
        let question = sample_question(&interview, &first);
        first.question_ids = vec![question.id];
        interview.round_ids = vec![second.id, first.id];

        let view = assemble_view((
            interview_to_row(&interview),
            None,
            vec![round_to_row(&first), round_to_row(&second)],
            vec![question_to_row(&question)],
        ))
        .expect("valid rows");

        let names: Vec<&str> = view
            .rounds
            .iter()
            .map(|round| round.round.name.as_ref())
            .collect();
        assert_eq!(names, vec!["Tech 1", "OA"]);
        assert_eq!(view.rounds[1].questions, vec![question]);
        assert!(view.interviewee.is_none());
    }
}
