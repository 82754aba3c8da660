//! Wire shapes for interviews, rounds and questions, plus request parsing.
//!
//! Request bodies carry raw strings so every rejected value is reported with
//! its field name instead of a generic deserialisation failure.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::poster_download_path;
use crate::domain::{
    CompanyName, Compensation, Error, ExperienceValidationError, Interview, InterviewDraft,
    InterviewEdit, InterviewFilter, InterviewListing, InterviewStatus, InterviewView, Offer, Page,
    Question, QuestionChanges, QuestionDescription, QuestionDraft, QuestionLink, QuestionTitle,
    Round, RoundChanges, RoundDraft, RoundName, RoundNote, RoundType, RoundView, UserSummary,
};
use crate::inbound::http::validation::{FieldName, experience_error, require};

/// Question nested in a round body or posted on its own.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBody {
    #[schema(example = "Two Sum problem explained")]
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = "https://leetcode.com/problems/two-sum/")]
    pub link: Option<String>,
}

/// Round nested in an interview body or posted on its own.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoundBody {
    #[schema(example = "OA")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[schema(example = "oa")]
    pub round_type: Option<String>,
    /// Unix time in milliseconds.
    pub date: Option<i64>,
    pub note: Option<String>,
    #[serde(default)]
    pub questions: Vec<QuestionBody>,
}

/// `POST /interviews` body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterviewBody {
    #[schema(example = "Acme")]
    pub company: Option<String>,
    #[schema(example = "placed")]
    pub status: Option<String>,
    #[schema(example = "fte")]
    pub offer: Option<String>,
    pub compensation: Option<f64>,
    #[serde(default)]
    pub rounds: Vec<RoundBody>,
    /// Queue for verification immediately.
    #[serde(default)]
    pub is_submitted: bool,
}

/// `PATCH /interviews/{id}` body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInterviewBody {
    pub company: Option<String>,
    pub status: Option<String>,
    pub offer: Option<String>,
    pub compensation: Option<f64>,
    #[serde(default)]
    pub is_submitted: bool,
}

/// `POST /rounds` body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoundBody {
    /// Parent interview id.
    pub interview: Option<String>,
    #[serde(flatten)]
    pub round: RoundBody,
}

/// `PATCH /rounds/{id}` body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoundBody {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub round_type: Option<String>,
    pub date: Option<i64>,
    pub note: Option<String>,
}

/// `POST /questions` body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionBody {
    pub interview: Option<String>,
    pub round: Option<String>,
    #[serde(flatten)]
    pub question: QuestionBody,
}

/// `PATCH /interviews/{id}/rejected` body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectBody {
    #[serde(default)]
    pub faults: Vec<String>,
}

/// Paging parameters shared by every listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// One-based page number.
    pub page: Option<u32>,
    /// Page size, 1 to 100.
    pub limit: Option<u32>,
}

/// Filters for the public listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InterviewListParams {
    /// Exact company name, case-insensitive.
    pub company: Option<String>,
    /// `ongoing`, `placed` or `not-placed`.
    pub status: Option<String>,
    /// `fte` or `intern`.
    pub offer: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntervieweeResponse {
    pub name: String,
    pub reg_no: String,
    pub batch: i32,
}

impl From<UserSummary> for IntervieweeResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            name: summary.name,
            reg_no: summary.reg_no,
            batch: summary.batch,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResponse {
    #[schema(example = "in-queue")]
    pub status: String,
    pub faults: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: String,
    pub round: String,
    pub interview: String,
    pub company: String,
    #[serde(rename = "type")]
    pub round_type: String,
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub created_at: String,
}

impl From<Question> for QuestionResponse {
    fn from(question: Question) -> Self {
        Self {
            id: question.id.to_string(),
            round: question.round_id.to_string(),
            interview: question.interview_id.to_string(),
            company: question.company.to_string(),
            round_type: question.round_type.to_string(),
            title: question.title.to_string(),
            description: question.description.map(|value| value.to_string()),
            link: question.link.map(|value| value.to_string()),
            created_at: question.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoundResponse {
    pub id: String,
    pub interview: String,
    pub name: String,
    #[serde(rename = "type")]
    pub round_type: String,
    pub date: Option<i64>,
    pub note: Option<String>,
    pub questions: Vec<QuestionResponse>,
    pub created_at: String,
}

impl RoundResponse {
    fn from_parts(round: Round, questions: Vec<Question>) -> Self {
        Self {
            id: round.id.to_string(),
            interview: round.interview_id.to_string(),
            name: round.name.to_string(),
            round_type: round.round_type.to_string(),
            date: round.date,
            note: round.note.map(|note| note.to_string()),
            questions: questions.into_iter().map(QuestionResponse::from).collect(),
            created_at: round.created_at.to_rfc3339(),
        }
    }
}

impl From<RoundView> for RoundResponse {
    fn from(view: RoundView) -> Self {
        Self::from_parts(view.round, view.questions)
    }
}

/// Interview with its rounds and questions populated.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterviewResponse {
    pub id: String,
    pub interviewee: Option<IntervieweeResponse>,
    pub company: String,
    pub status: String,
    pub offer: Option<String>,
    pub compensation: Option<f64>,
    pub verification: VerificationResponse,
    /// Download path once a poster has been generated.
    pub poster: Option<String>,
    pub rounds: Vec<RoundResponse>,
    pub created_at: String,
}

/// Interview as shown in listings, without nested rounds.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSummaryResponse {
    pub id: String,
    pub interviewee: Option<IntervieweeResponse>,
    pub company: String,
    pub status: String,
    pub offer: Option<String>,
    pub compensation: Option<f64>,
    pub verification: VerificationResponse,
    pub round_count: usize,
    pub created_at: String,
}

struct InterviewFields {
    id: String,
    company: String,
    status: String,
    offer: Option<String>,
    compensation: Option<f64>,
    verification: VerificationResponse,
    poster: Option<String>,
    created_at: String,
}

fn interview_fields(interview: Interview) -> InterviewFields {
    InterviewFields {
        id: interview.id.to_string(),
        company: interview.company.to_string(),
        status: interview.status.to_string(),
        offer: interview.offer.map(|offer| offer.to_string()),
        compensation: interview.compensation.map(Compensation::amount),
        verification: VerificationResponse {
            status: interview.verification.status.to_string(),
            faults: interview.verification.faults,
        },
        poster: interview
            .poster
            .map(|_| poster_download_path(interview.id)),
        created_at: interview.created_at.to_rfc3339(),
    }
}

impl From<InterviewView> for InterviewResponse {
    fn from(view: InterviewView) -> Self {
        let fields = interview_fields(view.interview);
        Self {
            id: fields.id,
            interviewee: view.interviewee.map(IntervieweeResponse::from),
            company: fields.company,
            status: fields.status,
            offer: fields.offer,
            compensation: fields.compensation,
            verification: fields.verification,
            poster: fields.poster,
            rounds: view.rounds.into_iter().map(RoundResponse::from).collect(),
            created_at: fields.created_at,
        }
    }
}

impl From<InterviewListing> for InterviewSummaryResponse {
    fn from(listing: InterviewListing) -> Self {
        let round_count = listing.interview.round_ids.len();
        let fields = interview_fields(listing.interview);
        Self {
            id: fields.id,
            interviewee: listing.interviewee.map(IntervieweeResponse::from),
            company: fields.company,
            status: fields.status,
            offer: fields.offer,
            compensation: fields.compensation,
            verification: fields.verification,
            round_count,
            created_at: fields.created_at,
        }
    }
}

/// One page of interviews.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterviewPageResponse {
    pub results: Vec<InterviewSummaryResponse>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl From<Page<InterviewListing>> for InterviewPageResponse {
    fn from(page: Page<InterviewListing>) -> Self {
        let total_pages = page.total_pages();
        Self {
            page: page.page,
            limit: page.limit,
            total: page.total,
            total_pages,
            results: page
                .results
                .into_iter()
                .map(InterviewSummaryResponse::from)
                .collect(),
        }
    }
}

fn parsed<T, E>(
    value: Option<String>,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Result<Option<T>, Error>
where
    E: Into<ExperienceValidationError>,
{
    value
        .map(|raw| parse(raw.trim()).map_err(|error| experience_error(error.into())))
        .transpose()
}

fn compensation(value: Option<f64>) -> Result<Option<Compensation>, Error> {
    value
        .map(Compensation::new)
        .transpose()
        .map_err(experience_error)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

pub(super) fn parse_question_draft(body: QuestionBody) -> Result<QuestionDraft, Error> {
    let title = require(body.title, FieldName::new("title"))?;
    Ok(QuestionDraft {
        title: QuestionTitle::new(&title).map_err(experience_error)?,
        description: parsed(non_blank(body.description), |raw| {
            QuestionDescription::new(raw)
        })?,
        link: parsed(non_blank(body.link), |raw| QuestionLink::new(raw))?,
    })
}

pub(super) fn parse_round_draft(body: RoundBody) -> Result<RoundDraft, Error> {
    let name = require(body.name, FieldName::new("name"))?;
    let round_type = require(body.round_type, FieldName::new("type"))?;
    Ok(RoundDraft {
        name: RoundName::new(&name).map_err(experience_error)?,
        round_type: RoundType::from_str(round_type.trim()).map_err(experience_error)?,
        date: body.date,
        note: parsed(non_blank(body.note), |raw| RoundNote::new(raw))?,
        questions: body
            .questions
            .into_iter()
            .map(parse_question_draft)
            .collect::<Result<_, _>>()?,
    })
}

pub(super) fn parse_interview_draft(body: CreateInterviewBody) -> Result<InterviewDraft, Error> {
    let company = require(body.company, FieldName::new("company"))?;
    Ok(InterviewDraft {
        company: CompanyName::new(&company).map_err(experience_error)?,
        status: parsed(body.status, InterviewStatus::from_str)?.unwrap_or_default(),
        offer: parsed(body.offer, Offer::from_str)?,
        compensation: compensation(body.compensation)?,
        rounds: body
            .rounds
            .into_iter()
            .map(parse_round_draft)
            .collect::<Result<_, _>>()?,
        submit: body.is_submitted,
    })
}

pub(super) fn parse_interview_edit(body: UpdateInterviewBody) -> Result<InterviewEdit, Error> {
    Ok(InterviewEdit {
        company: parsed(body.company, |raw| CompanyName::new(raw))?,
        status: parsed(body.status, InterviewStatus::from_str)?,
        offer: parsed(body.offer, Offer::from_str)?,
        compensation: compensation(body.compensation)?,
        submit: body.is_submitted,
    })
}

pub(super) fn parse_round_changes(body: UpdateRoundBody) -> Result<RoundChanges, Error> {
    Ok(RoundChanges {
        name: parsed(body.name, |raw| RoundName::new(raw))?,
        round_type: parsed(body.round_type, RoundType::from_str)?,
        date: body.date,
        note: parsed(body.note, |raw| RoundNote::new(raw))?,
    })
}

pub(super) fn parse_question_changes(body: QuestionBody) -> Result<QuestionChanges, Error> {
    Ok(QuestionChanges {
        title: parsed(body.title, |raw| QuestionTitle::new(raw))?,
        description: parsed(body.description, |raw| QuestionDescription::new(raw))?,
        link: parsed(body.link, |raw| QuestionLink::new(raw))?,
    })
}

pub(super) fn parse_filter(params: &InterviewListParams) -> Result<InterviewFilter, Error> {
    Ok(InterviewFilter {
        company: non_blank(params.company.clone()),
        status: parsed(non_blank(params.status.clone()), InterviewStatus::from_str)?,
        offer: parsed(non_blank(params.offer.clone()), Offer::from_str)?,
    })
}
