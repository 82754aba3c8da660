//! Port for transactional email.
//!
//! Callers decide whether a failed delivery matters: the verification and
//! poster flows log and carry on, the OTP flows roll the token back.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Email, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notifier adapters.
    pub enum NotifierError {
        /// The mail provider rejected or never received the message.
        Delivery { message: String } => "notification delivery failed: {message}",
    }
}

/// Addressee of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub name: String,
    pub email: Email,
}

impl From<&User> for Recipient {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.as_ref().to_owned(),
            email: user.email.clone(),
        }
    }
}

/// Message kinds the backend sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    ExperienceAccepted {
        interview_id: Uuid,
        company: String,
    },
    ExperienceRejected {
        interview_id: Uuid,
        company: String,
        faults: Vec<String>,
    },
    Welcome,
    /// One-time token that activates a pre-created account.
    SignupOtp { token: String },
    PasswordReset { token: String },
    Poster { link: String },
}

impl Notification {
    pub fn subject(&self) -> &'static str {
        match self {
            Self::ExperienceAccepted { .. } => "Your experience has been accepted",
            Self::ExperienceRejected { .. } => "Your experience needs changes",
            Self::Welcome => "Welcome to the placement experience repository",
            Self::SignupOtp { .. } => "Your signup token (valid for 10 minutes)",
            Self::PasswordReset { .. } => "Your password reset token (valid for 10 minutes)",
            Self::Poster { .. } => "Your experience poster is ready",
        }
    }

    /// Plain-text body addressed to `name`.
    pub fn body(&self, name: &str) -> String {
        match self {
            Self::ExperienceAccepted { company, .. } => format!(
                "Hi {name},\n\nYour {company} experience was accepted and is now public."
            ),
            Self::ExperienceRejected {
                company, faults, ..
            } => {
                let mut body = format!(
                    "Hi {name},\n\nYour {company} experience was not accepted. \
                     Please update it and submit again."
                );
                for fault in faults {
                    body.push_str("\n- ");
                    body.push_str(fault);
                }
                body
            }
            Self::Welcome => format!("Hi {name},\n\nYour account is now active."),
            Self::SignupOtp { token } | Self::PasswordReset { token } => {
                format!("Hi {name},\n\nYour token is {token}. It expires in 10 minutes.")
            }
            Self::Poster { link } => {
                format!("Hi {name},\n\nYour poster is ready. Download it from {link}")
            }
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        recipient: &Recipient,
        notification: &Notification,
    ) -> Result<(), NotifierError>;
}
