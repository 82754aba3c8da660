//! Administrator account management and batch roster import.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::account_service::{map_hash_error, map_user_error};
use crate::domain::ports::{
    NewUser, PasswordHasher, RosterEntry, RosterFailure, RosterImportReport, UserAdminCommand,
    UserPersistenceError, UserRepository, UserUpdate,
};
use crate::domain::{
    ADMINS, Batch, Caller, Capability, Error, NewPassword, Page, PageRequest, RegNo, Role, User,
    UserId, UserName, authorize,
};

/// Service implementing [`UserAdminCommand`].
#[derive(Clone)]
pub struct UserAdminService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
    /// Domain appended to registration numbers during roster import.
    email_domain: String,
}

impl<U, H> UserAdminService<U, H> {
    pub fn new(
        users: Arc<U>,
        hasher: Arc<H>,
        clock: Arc<dyn Clock>,
        email_domain: impl Into<String>,
    ) -> Self {
        Self {
            users,
            hasher,
            clock,
            email_domain: email_domain.into(),
        }
    }
}

impl<U, H> UserAdminService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn user_by_reg_no(&self, reg_no: &RegNo) -> Result<User, Error> {
        self.users
            .find_by_reg_no(reg_no)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("no user with registration number {reg_no}")))
    }

    /// Create `admin` as an inactive administrator unless its registration
    /// number is already taken. Returns whether an account was created.
    ///
    /// Used at start-up so a fresh deployment has someone who can sign up
    /// and manage the rest of the accounts.
    pub async fn ensure_admin(&self, admin: NewUser) -> Result<bool, Error> {
        if self
            .users
            .find_by_reg_no(&admin.reg_no)
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Ok(false);
        }
        let user = self.new_account(NewUser {
            role: Role::Admin,
            ..admin
        })
        .await?;
        self.users.insert(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id, reg_no = %user.reg_no, "bootstrap administrator created");
        Ok(true)
    }

    /// Inactive account with a random password nobody knows.
    async fn new_account(&self, user: NewUser) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(NewPassword::random().expose())
            .await
            .map_err(map_hash_error)?;
        Ok(User {
            id: UserId::random(),
            name: user.name,
            reg_no: user.reg_no,
            batch: user.batch,
            email: user.email,
            role: user.role,
            active: false,
            password_hash,
            password_changed_at: None,
            reset_token: None,
            reset_expires_at: None,
            created_at: self.clock.utc(),
        })
    }

    fn roster_user(&self, batch: Batch, entry: &RosterEntry) -> Result<NewUser, String> {
        let name = UserName::new(entry.name.as_str()).map_err(|err| err.to_string())?;
        let reg_no = RegNo::new(&entry.reg_no).map_err(|err| err.to_string())?;
        let email = reg_no
            .email_at(&self.email_domain)
            .map_err(|err| err.to_string())?;
        Ok(NewUser {
            name,
            reg_no,
            batch,
            email,
            role: Role::User,
        })
    }

    /// Import one roster line. Only store outages abort the whole import.
    async fn import_entry(&self, batch: Batch, entry: &RosterEntry) -> Result<EntryOutcome, Error> {
        let new_user = match self.roster_user(batch, entry) {
            Ok(new_user) => new_user,
            Err(reason) => return Ok(EntryOutcome::Failed(reason)),
        };
        let user = self.new_account(new_user).await?;
        match self.users.insert(&user).await {
            Ok(()) => Ok(EntryOutcome::Created),
            Err(error @ UserPersistenceError::Connection { .. }) => Err(map_user_error(error)),
            Err(UserPersistenceError::Duplicate { field }) => {
                Ok(EntryOutcome::Failed(format!("{field} already exists")))
            }
            Err(error) => Ok(EntryOutcome::Failed(error.to_string())),
        }
    }
}

enum EntryOutcome {
    Created,
    Failed(String),
}

#[async_trait]
impl<U, H> UserAdminCommand for UserAdminService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn list_users(&self, caller: Caller, page: PageRequest) -> Result<Page<User>, Error> {
        authorize(&caller, Capability::Role(ADMINS))?;
        self.users.list(page).await.map_err(map_user_error)
    }

    async fn get_user(&self, caller: Caller, reg_no: RegNo) -> Result<User, Error> {
        authorize(&caller, Capability::Role(ADMINS))?;
        self.user_by_reg_no(&reg_no).await
    }

    async fn create_user(&self, caller: Caller, user: NewUser) -> Result<User, Error> {
        authorize(&caller, Capability::Role(ADMINS))?;
        let user = self.new_account(user).await?;
        self.users.insert(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id, reg_no = %user.reg_no, "user created");
        Ok(user)
    }

    async fn update_user(
        &self,
        caller: Caller,
        reg_no: RegNo,
        update: UserUpdate,
    ) -> Result<User, Error> {
        authorize(&caller, Capability::Role(ADMINS))?;
        let mut user = self.user_by_reg_no(&reg_no).await?;
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(batch) = update.batch {
            user.batch = batch;
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(active) = update.active {
            user.active = active;
        }
        self.users.update(&user).await.map_err(map_user_error)?;
        Ok(user)
    }

    async fn delete_user(&self, caller: Caller, reg_no: RegNo) -> Result<(), Error> {
        authorize(&caller, Capability::Role(ADMINS))?;
        let user = self.user_by_reg_no(&reg_no).await?;
        self.users.delete(&user.id).await.map_err(map_user_error)?;
        info!(user_id = %user.id, reg_no = %user.reg_no, "user deleted");
        Ok(())
    }

    async fn import_roster(
        &self,
        caller: Caller,
        batch: Batch,
        entries: Vec<RosterEntry>,
    ) -> Result<RosterImportReport, Error> {
        authorize(&caller, Capability::Role(ADMINS))?;
        let mut report = RosterImportReport {
            total: entries.len(),
            ..Default::default()
        };
        for entry in &entries {
            match self.import_entry(batch, entry).await? {
                EntryOutcome::Created => report.created += 1,
                EntryOutcome::Failed(reason) => report.failures.push(RosterFailure {
                    reg_no: entry.reg_no.clone(),
                    reason,
                }),
            }
        }
        report.failed = report.failures.len();
        info!(
            batch = batch.year(),
            total = report.total,
            created = report.created,
            failed = report.failed,
            "roster import finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "user_admin_service_tests.rs"]
mod tests;
