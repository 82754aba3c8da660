//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Email, Page, PageRequest, RegNo, ResetTokenDigest, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique column (registration number or email) is already taken.
        Duplicate { field: String } => "user repository duplicate {field}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;

    async fn find_by_reg_no(&self, reg_no: &RegNo) -> Result<Option<User>, UserPersistenceError>;

    /// User holding `digest` whose token expires after `now`.
    async fn find_by_reset_token(
        &self,
        digest: &ResetTokenDigest,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError>;

    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Overwrite every mutable column of an existing user.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Hard delete. Interviews owned by the user go with it.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;

    /// Users ordered by registration number.
    async fn list(&self, page: PageRequest) -> Result<Page<User>, UserPersistenceError>;
}
