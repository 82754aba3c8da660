//! Internal Diesel row structs.
//!
//! These never leave the persistence layer. Conversions to and from domain
//! types live next to the repositories that use them.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{interviews, questions, rounds, users};

/// Full user row, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub reg_no: String,
    pub batch: i32,
    pub email: String,
    pub role: String,
    pub active: bool,
    pub password_hash: String,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub reset_token: Option<String>,
    pub reset_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Every mutable user column. `None` writes NULL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserChangeset<'a> {
    pub name: &'a str,
    pub reg_no: &'a str,
    pub batch: i32,
    pub email: &'a str,
    pub role: &'a str,
    pub active: bool,
    pub password_hash: &'a str,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub reset_token: Option<&'a str>,
    pub reset_expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = interviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InterviewRow {
    pub id: Uuid,
    pub interviewee: Uuid,
    pub company: String,
    pub round_ids: Vec<Uuid>,
    pub status: String,
    pub verification_status: String,
    pub verification_faults: Vec<String>,
    pub offer: Option<String>,
    pub compensation: Option<f64>,
    pub poster: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Partial interview update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = interviews)]
pub(crate) struct InterviewChangeset<'a> {
    pub company: Option<&'a str>,
    pub status: Option<&'a str>,
    pub verification_status: Option<&'a str>,
    pub verification_faults: Option<&'a [String]>,
    pub offer: Option<&'a str>,
    pub compensation: Option<f64>,
    pub poster: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = rounds)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoundRow {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub interviewee: Uuid,
    pub name: String,
    pub round_type: String,
    pub date: Option<i64>,
    pub note: Option<String>,
    pub question_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = rounds)]
pub(crate) struct RoundChangeset<'a> {
    pub name: Option<&'a str>,
    pub round_type: Option<&'a str>,
    pub date: Option<i64>,
    pub note: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = questions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct QuestionRow {
    pub id: Uuid,
    pub round_id: Uuid,
    pub interview_id: Uuid,
    pub interviewee: Uuid,
    pub company: String,
    pub round_type: String,
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = questions)]
pub(crate) struct QuestionChangeset<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub link: Option<&'a str>,
}
