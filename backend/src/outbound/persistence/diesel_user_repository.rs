//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::expression::BoxableExpression;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Batch, Email, Page, PageRequest, RegNo, ResetTokenDigest, Role, User, UserId, UserName,
    UserValidationError,
};

use super::error_mapping::{DbFailure, classify_diesel_error, classify_pool_error};
use super::models::{UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Name reported to callers for each unique constraint on `users`.
fn duplicate_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_email_key") => "email",
        Some("users_reg_no_key") => "registration number",
        _ => "identifier",
    }
}

fn to_user_error(failure: DbFailure) -> UserPersistenceError {
    match failure {
        DbFailure::Connection(message) => UserPersistenceError::connection(message),
        DbFailure::Conflict {
            constraint: Some(constraint),
            ..
        } => UserPersistenceError::duplicate(duplicate_field(Some(constraint.as_str()))),
        DbFailure::Conflict { message, .. } | DbFailure::Query(message) => {
            UserPersistenceError::query(message)
        }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    to_user_error(classify_pool_error(error))
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    to_user_error(classify_diesel_error(error))
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let id = row.id;
    let corrupt = move |error: UserValidationError| {
        UserPersistenceError::query(format!("stored user {id} is invalid: {error}"))
    };
    Ok(User {
        id: UserId::from_uuid(row.id),
        name: UserName::new(row.name.as_str()).map_err(corrupt)?,
        reg_no: RegNo::new(&row.reg_no).map_err(corrupt)?,
        batch: Batch::new(row.batch).map_err(corrupt)?,
        email: Email::new(&row.email).map_err(corrupt)?,
        role: row.role.parse::<Role>().map_err(corrupt)?,
        active: row.active,
        password_hash: row.password_hash,
        password_changed_at: row.password_changed_at,
        reset_token: row.reset_token.map(ResetTokenDigest::from_stored),
        reset_expires_at: row.reset_expires_at,
        created_at: row.created_at,
    })
}

fn user_to_row(user: &User) -> UserRow {
    UserRow {
        id: *user.id.as_uuid(),
        name: user.name.as_ref().to_owned(),
        reg_no: user.reg_no.as_ref().to_owned(),
        batch: user.batch.year(),
        email: user.email.as_ref().to_owned(),
        role: user.role.as_str().to_owned(),
        active: user.active,
        password_hash: user.password_hash.clone(),
        password_changed_at: user.password_changed_at,
        reset_token: user.reset_token.as_ref().map(|t| t.as_ref().to_owned()),
        reset_expires_at: user.reset_expires_at,
        created_at: user.created_at,
    }
}

fn user_changeset(user: &User) -> UserChangeset<'_> {
    UserChangeset {
        name: user.name.as_ref(),
        reg_no: user.reg_no.as_ref(),
        batch: user.batch.year(),
        email: user.email.as_ref(),
        role: user.role.as_str(),
        active: user.active,
        password_hash: &user.password_hash,
        password_changed_at: user.password_changed_at,
        reset_token: user.reset_token.as_ref().map(AsRef::as_ref),
        reset_expires_at: user.reset_expires_at,
    }
}

type UserFilter = Box<dyn BoxableExpression<users::table, Pg, SqlType = Bool>>;

fn page_bounds(page: PageRequest) -> Result<(i64, i64), UserPersistenceError> {
    let offset = i64::try_from(page.offset())
        .map_err(|_| UserPersistenceError::query("page offset exceeds i64 range"))?;
    Ok((i64::from(page.limit()), offset))
}

impl DieselUserRepository {
    async fn find_one(&self, filter: UserFilter) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(filter)
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        self.find_one(Box::new(users::id.eq(*id.as_uuid()))).await
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        self.find_one(Box::new(users::email.eq(email.as_ref().to_owned())))
            .await
    }

    async fn find_by_reg_no(&self, reg_no: &RegNo) -> Result<Option<User>, UserPersistenceError> {
        self.find_one(Box::new(users::reg_no.eq(reg_no.as_ref().to_owned())))
            .await
    }

    async fn find_by_reset_token(
        &self,
        digest: &ResetTokenDigest,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.find_one(Box::new(
            users::reset_token
                .assume_not_null()
                .eq(digest.as_ref().to_owned())
                .and(users::reset_expires_at.assume_not_null().gt(now)),
        ))
        .await
    }

    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(&user_to_row(user))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.find(*user.id.as_uuid()))
            .set(&user_changeset(user))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(UserPersistenceError::query(format!(
                "user {} not found",
                user.id
            )));
        }
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Interviews, rounds and questions go with the user via ON DELETE CASCADE.
        let deleted = diesel::delete(users::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<User>, UserPersistenceError> {
        let (limit, offset) = page_bounds(page)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order(users::reg_no.asc())
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let users = rows
            .into_iter()
            .map(row_to_user)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(users, page, u64::try_from(total).unwrap_or_default()))
    }
}
