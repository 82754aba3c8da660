//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Both operations run on tokio's blocking pool; a single hash takes tens of
//! milliseconds of CPU and about 19 MiB of memory.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use async_trait::async_trait;
use tokio::task::JoinError;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Hashes with Argon2id default parameters and a random salt per password.
#[derive(Debug, Default, Clone)]
pub struct Argon2Hasher {
    argon: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    fn hash_blocking(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    fn verify_blocking(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let parsed =
            PasswordHash::new(hash).map_err(|err| PasswordHashError::malformed(err.to_string()))?;
        match self.argon.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::hash(err.to_string())),
        }
    }
}

fn join_error(error: JoinError) -> PasswordHashError {
    PasswordHashError::hash(format!("hashing task failed: {error}"))
}

#[async_trait]
impl PasswordHasher for Argon2Hasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let hasher = self.clone();
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash_blocking(&password))
            .await
            .map_err(join_error)?
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let hasher = self.clone();
        let password = Zeroizing::new(password.to_owned());
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify_blocking(&password, &hash))
            .await
            .map_err(join_error)?
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn hasher() -> Argon2Hasher {
        Argon2Hasher::new()
    }

    #[rstest]
    #[tokio::test]
    async fn hashes_verify_only_the_original_password(hasher: Argon2Hasher) {
        let hash = hasher.hash("correct horse battery").await.expect("hash");

        assert!(hash.starts_with("$argon2id$"));
        assert!(
            hasher
                .verify("correct horse battery", &hash)
                .await
                .expect("verify")
        );
        assert!(
            !hasher
                .verify("wrong horse battery", &hash)
                .await
                .expect("verify")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn salts_differ_between_hashes(hasher: Argon2Hasher) {
        let first = hasher.hash("same password").await.expect("hash");
        let second = hasher.hash("same password").await.expect("hash");
        assert_ne!(first, second);
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_hash_is_reported(hasher: Argon2Hasher) {
        let error = hasher
            .verify("anything", "not-a-phc-string")
            .await
            .expect_err("malformed");
        assert!(matches!(error, PasswordHashError::Malformed { .. }));
    }
}
