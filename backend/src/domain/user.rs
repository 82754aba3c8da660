//! Student accounts and their validated fields.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::auth::ResetTokenDigest;

/// Validation errors raised by the user field constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidId,
    NameTooShort { min: usize },
    NameTooLong { max: usize },
    EmptyRegNo,
    InvalidRegNo,
    InvalidEmail,
    BatchOutOfRange { min: i32, max: i32 },
    UnknownRole { value: String },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::NameTooShort { min } => write!(f, "name must be at least {min} characters"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmptyRegNo => write!(f, "registration number must not be empty"),
            Self::InvalidRegNo => write!(
                f,
                "registration number may only contain letters and digits",
            ),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::BatchOutOfRange { min, max } => {
                write!(f, "batch must be a year between {min} and {max}")
            }
            Self::UnknownRole { value } => write!(f, "unknown role: {value}"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Minimum allowed length for a user name.
pub const USER_NAME_MIN: usize = 3;
/// Maximum allowed length for a user name.
pub const USER_NAME_MAX: usize = 30;

/// Full name as shown on experiences and posters. Stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        let length = trimmed.chars().count();
        if length < USER_NAME_MIN {
            return Err(UserValidationError::NameTooShort { min: USER_NAME_MIN });
        }
        if length > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: USER_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static REG_NO_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn reg_no_regex() -> &'static Regex {
    REG_NO_RE.get_or_init(|| {
        Regex::new("^[a-z0-9]{1,32}$")
            .unwrap_or_else(|error| panic!("registration number regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// College registration number, the human-facing identity key.
///
/// Stored lower-case so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegNo(String);

impl RegNo {
    pub fn new(reg_no: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = reg_no.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyRegNo);
        }
        if !reg_no_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidRegNo);
        }
        Ok(Self(normalised))
    }

    /// Institutional address derived from the registration number.
    pub fn email_at(&self, domain: &str) -> Result<Email, UserValidationError> {
        Email::new(format!("{}@{domain}", self.0))
    }
}

impl AsRef<str> for RegNo {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RegNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = email.as_ref().trim().to_lowercase();
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Earliest accepted batch year.
pub const BATCH_MIN: i32 = 1950;
/// Latest accepted batch year.
pub const BATCH_MAX: i32 = 2100;

/// Graduating batch year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Batch(i32);

impl Batch {
    pub fn new(year: i32) -> Result<Self, UserValidationError> {
        if !(BATCH_MIN..=BATCH_MAX).contains(&year) {
            return Err(UserValidationError::BatchOutOfRange {
                min: BATCH_MIN,
                max: BATCH_MAX,
            });
        }
        Ok(Self(year))
    }

    pub fn year(self) -> i32 {
        self.0
    }
}

/// Account role used by the authorization gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Verifier,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Verifier => "verifier",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "verifier" => Ok(Self::Verifier),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownRole {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Student account.
///
/// ## Invariants
/// - `reg_no` and `email` are unique across accounts.
/// - `password_hash` is a PHC string and never leaves the domain.
/// - `reset_token` and `reset_expires_at` are set or cleared together.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: UserName,
    pub reg_no: RegNo,
    pub batch: Batch,
    pub email: Email,
    pub role: Role,
    pub active: bool,
    pub password_hash: String,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub reset_token: Option<ResetTokenDigest>,
    pub reset_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether the password changed after a session was issued at `issued_at`.
    pub fn password_changed_after(&self, issued_at: DateTime<Utc>) -> bool {
        self.password_changed_at
            .is_some_and(|changed_at| changed_at > issued_at)
    }

    /// Public identity shown next to an experience.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            name: self.name.as_ref().to_owned(),
            reg_no: self.reg_no.as_ref().to_owned(),
            batch: self.batch.year(),
        }
    }

    pub fn clear_reset_token(&mut self) {
        self.reset_token = None;
        self.reset_expires_at = None;
    }
}

/// Interviewee identity attached to populated experiences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub name: String,
    pub reg_no: String,
    pub batch: i32,
}
