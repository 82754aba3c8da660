//! Driving port for administrator account management.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Batch, Caller, Email, Error, Page, PageRequest, RegNo, Role, User, UserName};

/// Account created by an administrator. Starts inactive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: UserName,
    pub reg_no: RegNo,
    pub batch: Batch,
    pub email: Email,
    pub role: Role,
}

/// Administrator edits. `None` leaves a field untouched. Passwords are
/// deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<UserName>,
    pub email: Option<Email>,
    pub batch: Option<Batch>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

/// Raw roster line. Validated per entry so one bad line does not sink the
/// import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
    pub reg_no: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterFailure {
    pub reg_no: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterImportReport {
    pub total: usize,
    pub created: usize,
    pub failed: usize,
    pub failures: Vec<RosterFailure>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAdminCommand: Send + Sync {
    async fn list_users(&self, caller: Caller, page: PageRequest) -> Result<Page<User>, Error>;

    async fn get_user(&self, caller: Caller, reg_no: RegNo) -> Result<User, Error>;

    async fn create_user(&self, caller: Caller, user: NewUser) -> Result<User, Error>;

    async fn update_user(
        &self,
        caller: Caller,
        reg_no: RegNo,
        update: UserUpdate,
    ) -> Result<User, Error>;

    async fn delete_user(&self, caller: Caller, reg_no: RegNo) -> Result<(), Error>;

    /// Create inactive accounts for every roster entry of `batch`.
    async fn import_roster(
        &self,
        caller: Caller,
        batch: Batch,
        entries: Vec<RosterEntry>,
    ) -> Result<RosterImportReport, Error>;
}
