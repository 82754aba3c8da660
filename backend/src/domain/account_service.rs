//! Account self-service: OTP signup, login, password reset and change, and
//! session authentication.
//!
//! Accounts are created inactive by an administrator. Students activate them
//! by redeeming a mailed one-time token, which doubles as the password reset
//! flow once the account is active.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountCommand, Notification, Notifier, PasswordHashError, PasswordHasher, Recipient,
    ResetPasswordRequest, SessionGrant, UpdatePasswordRequest, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, NewPassword, RegNo, ResetToken, User, UserId, reset_token_ttl,
};

const INCORRECT_CREDENTIALS: &str = "incorrect email or password";

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { field } => {
            Error::conflict(format!("a user with this {field} already exists"))
        }
    }
}

pub(crate) fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

/// Which mail an issued token travels in.
#[derive(Debug, Clone, Copy)]
enum TokenPurpose {
    Signup,
    Reset,
}

impl TokenPurpose {
    fn notification(self, token: &ResetToken) -> Notification {
        let token = token.expose().to_owned();
        match self {
            Self::Signup => Notification::SignupOtp { token },
            Self::Reset => Notification::PasswordReset { token },
        }
    }
}

/// Service implementing [`AccountCommand`].
#[derive(Clone)]
pub struct AccountService<U, H, N: ?Sized> {
    users: Arc<U>,
    hasher: Arc<H>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<U, H, N: ?Sized> AccountService<U, H, N> {
    pub fn new(users: Arc<U>, hasher: Arc<H>, notifier: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            notifier,
            clock,
        }
    }
}

impl<U, H, N: ?Sized> AccountService<U, H, N>
where
    U: UserRepository,
    H: PasswordHasher,
    N: Notifier,
{
    async fn user_by_reg_no(&self, reg_no: &RegNo) -> Result<User, Error> {
        self.users
            .find_by_reg_no(reg_no)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("no user with registration number {reg_no}")))
    }

    /// Store a fresh token digest and mail the plain token.
    ///
    /// A failed delivery clears the token again so no unusable token lingers.
    async fn issue_token(&self, mut user: User, purpose: TokenPurpose) -> Result<(), Error> {
        let token = ResetToken::generate();
        user.reset_token = Some(token.digest());
        user.reset_expires_at = Some(self.clock.utc() + reset_token_ttl());
        self.users.update(&user).await.map_err(map_user_error)?;

        let recipient = Recipient::from(&user);
        if let Err(error) = self
            .notifier
            .send(&recipient, &purpose.notification(&token))
            .await
        {
            warn!(user_id = %user.id, %error, "token delivery failed; clearing token");
            user.clear_reset_token();
            if let Err(rollback) = self.users.update(&user).await {
                warn!(user_id = %user.id, error = %rollback, "failed to clear undelivered token");
            }
            return Err(Error::internal(
                "there was an error sending the email, try again later",
            ));
        }
        info!(user_id = %user.id, ?purpose, "one-time token issued");
        Ok(())
    }

    async fn verify_password(&self, password: &str, user: &User) -> Result<bool, Error> {
        self.hasher
            .verify(password, &user.password_hash)
            .await
            .map_err(map_hash_error)
    }

    /// Hash and store `password`, returning the change instant.
    ///
    /// The instant is truncated to milliseconds, the precision the session
    /// cookie keeps, so the session issued with it stays valid.
    async fn set_password(
        &self,
        user: &mut User,
        password: &NewPassword,
    ) -> Result<DateTime<Utc>, Error> {
        let now = self.clock.utc().trunc_subsecs(3);
        user.password_hash = self
            .hasher
            .hash(password.expose())
            .await
            .map_err(map_hash_error)?;
        user.password_changed_at = Some(now);
        Ok(now)
    }
}

#[async_trait]
impl<U, H, N: ?Sized> AccountCommand for AccountService<U, H, N>
where
    U: UserRepository,
    H: PasswordHasher,
    N: Notifier,
{
    async fn signup(&self, reg_no: RegNo) -> Result<(), Error> {
        let user = self.user_by_reg_no(&reg_no).await?;
        if user.active {
            return Err(Error::conflict("this account is already active, log in instead"));
        }
        self.issue_token(user, TokenPurpose::Signup).await
    }

    async fn forgot_password(&self, reg_no: RegNo) -> Result<(), Error> {
        let user = self.user_by_reg_no(&reg_no).await?;
        if !user.active {
            return Err(Error::invalid_request(
                "this account is not registered yet, sign up first",
            ));
        }
        self.issue_token(user, TokenPurpose::Reset).await
    }

    async fn reset_password(&self, request: ResetPasswordRequest) -> Result<SessionGrant, Error> {
        let mut user = self
            .users
            .find_by_reset_token(&request.token.digest(), self.clock.utc())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::invalid_request("token is invalid or has expired"))?;

        let issued_at = self.set_password(&mut user, &request.password).await?;
        user.clear_reset_token();
        let first_activation = !user.active;
        user.active = true;
        self.users.update(&user).await.map_err(map_user_error)?;

        if first_activation {
            info!(user_id = %user.id, "account activated");
            if let Err(error) = self
                .notifier
                .send(&Recipient::from(&user), &Notification::Welcome)
                .await
            {
                warn!(user_id = %user.id, %error, "welcome email failed");
            }
        }
        Ok(SessionGrant { user, issued_at })
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<SessionGrant, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
            .filter(|user| user.active)
            .ok_or_else(|| Error::unauthorized(INCORRECT_CREDENTIALS))?;
        if !self.verify_password(credentials.password(), &user).await? {
            return Err(Error::unauthorized(INCORRECT_CREDENTIALS));
        }
        Ok(SessionGrant {
            user,
            issued_at: self.clock.utc(),
        })
    }

    async fn update_password(
        &self,
        request: UpdatePasswordRequest,
    ) -> Result<SessionGrant, Error> {
        let mut user = self
            .users
            .find_by_id(&request.user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("the user for this session no longer exists"))?;
        if !self.verify_password(request.current.as_str(), &user).await? {
            return Err(Error::unauthorized("your current password is wrong"));
        }

        let issued_at = self.set_password(&mut user, &request.password).await?;
        self.users.update(&user).await.map_err(map_user_error)?;
        Ok(SessionGrant { user, issued_at })
    }

    async fn authenticate(
        &self,
        user_id: UserId,
        issued_at: DateTime<Utc>,
    ) -> Result<User, Error> {
        let user = self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("the user for this session no longer exists"))?;
        if !user.active {
            return Err(Error::unauthorized("this account is not active"));
        }
        if user.password_changed_after(issued_at) {
            return Err(Error::unauthorized(
                "password changed recently, please log in again",
            ));
        }
        Ok(user)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
