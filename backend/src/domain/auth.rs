//! Authentication primitives: login credentials, new passwords, and
//! one-time reset tokens.
//!
//! Inbound adapters construct these from raw strings before a handler talks
//! to a port or service, so services only ever see validated values.

use std::fmt;

use chrono::Duration;
use rand::Rng;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::user::{Email, UserValidationError};

/// Minimum accepted password length.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Lifetime of a signup or password-reset token.
pub fn reset_token_ttl() -> Duration {
    Duration::minutes(10)
}

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or malformed.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// # Examples
/// ```
/// use experience_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@Example.com", "secret-pass")
///     .expect("valid credentials");
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    ///
    /// The password keeps caller-provided whitespace.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = Email::new(email).map_err(|_: UserValidationError| {
            LoginValidationError::InvalidEmail
        })?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Errors raised when a replacement password is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordValidationError {
    TooShort { min: usize },
    ConfirmationMismatch,
}

impl fmt::Display for PasswordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { min } => write!(f, "password must be at least {min} characters"),
            Self::ConfirmationMismatch => write!(f, "passwords are not the same"),
        }
    }
}

impl std::error::Error for PasswordValidationError {}

/// A password chosen during reset or change, checked against its confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    pub fn try_new(password: &str, confirmation: &str) -> Result<Self, PasswordValidationError> {
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(PasswordValidationError::TooShort {
                min: PASSWORD_MIN_LEN,
            });
        }
        if password != confirmation {
            return Err(PasswordValidationError::ConfirmationMismatch);
        }
        Ok(Self(Zeroizing::new(password.to_owned())))
    }

    /// Random password for accounts created by an administrator.
    ///
    /// The owner never learns it; they set their own through the signup OTP.
    pub fn random() -> Self {
        let bytes: [u8; 16] = rand::thread_rng().r#gen();
        Self(Zeroizing::new(hex::encode(bytes)))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

/// Plain one-time token mailed to the user.
///
/// Three random bytes rendered as six upper-case hex characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetToken(Zeroizing<String>);

impl ResetToken {
    pub fn generate() -> Self {
        let bytes: [u8; 3] = rand::thread_rng().r#gen();
        Self(Zeroizing::new(hex::encode_upper(bytes)))
    }

    /// Wrap a token supplied by a client. Surrounding whitespace is ignored.
    pub fn from_client(raw: &str) -> Self {
        Self(Zeroizing::new(raw.trim().to_uppercase()))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// SHA-256 digest persisted in place of the token.
    pub fn digest(&self) -> ResetTokenDigest {
        let hash = Sha256::digest(self.0.as_bytes());
        ResetTokenDigest(hex::encode(hash))
    }
}

/// Hex-encoded SHA-256 digest of a [`ResetToken`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResetTokenDigest(String);

impl ResetTokenDigest {
    /// Rehydrate a digest read back from storage.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl AsRef<str> for ResetTokenDigest {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::InvalidEmail)]
    #[case("not-an-email", "pw", LoginValidationError::InvalidEmail)]
    #[case("ada@example.com", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("short", "short", PasswordValidationError::TooShort { min: PASSWORD_MIN_LEN })]
    #[case("long-enough", "long-enougH", PasswordValidationError::ConfirmationMismatch)]
    fn new_password_rejections(
        #[case] password: &str,
        #[case] confirmation: &str,
        #[case] expected: PasswordValidationError,
    ) {
        assert_eq!(NewPassword::try_new(password, confirmation), Err(expected));
    }

    #[rstest]
    fn generated_token_is_six_upper_hex_chars() {
        let token = ResetToken::generate();
        assert_eq!(token.expose().len(), 6);
        assert!(
            token
                .expose()
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        );
    }

    #[rstest]
    fn client_token_digest_matches_generated_digest() {
        let token = ResetToken::generate();
        let echoed = ResetToken::from_client(&format!(" {} ", token.expose().to_lowercase()));
        assert_eq!(echoed.digest(), token.digest());
    }

    #[rstest]
    fn digest_is_sha256_hex() {
        let digest = ResetToken::from_client("ABC123").digest();
        assert_eq!(digest.as_ref().len(), 64);
        assert_ne!(digest.as_ref(), "ABC123");
    }

    #[rstest]
    fn random_passwords_satisfy_policy() {
        let password = NewPassword::random();
        assert!(password.expose().len() >= PASSWORD_MIN_LEN);
    }
}
