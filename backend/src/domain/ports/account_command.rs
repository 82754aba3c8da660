//! Driving port for account self-service and session authentication.
//!
//! Inbound adapters call it to authenticate credentials and to resolve a
//! session cookie into a [`User`] without knowing the backing
//! infrastructure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use crate::domain::{
    Error, LoginCredentials, NewPassword, RegNo, ResetToken, User, UserId,
};

/// Authenticated user plus the instant the session should record.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionGrant {
    pub user: User,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetPasswordRequest {
    pub token: ResetToken,
    pub password: NewPassword,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePasswordRequest {
    pub user_id: UserId,
    pub current: Zeroizing<String>,
    pub password: NewPassword,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Mail an activation token to a pre-created, inactive account.
    async fn signup(&self, reg_no: RegNo) -> Result<(), Error>;

    /// Mail a reset token to an active account.
    async fn forgot_password(&self, reg_no: RegNo) -> Result<(), Error>;

    /// Redeem a token, set the password and activate the account.
    async fn reset_password(&self, request: ResetPasswordRequest) -> Result<SessionGrant, Error>;

    async fn login(&self, credentials: LoginCredentials) -> Result<SessionGrant, Error>;

    async fn update_password(&self, request: UpdatePasswordRequest)
    -> Result<SessionGrant, Error>;

    /// Resolve a session into its user.
    ///
    /// Fails with `unauthorized` when the user is gone or inactive, or when
    /// the password changed after `issued_at`.
    async fn authenticate(&self, user_id: UserId, issued_at: DateTime<Utc>)
    -> Result<User, Error>;
}
