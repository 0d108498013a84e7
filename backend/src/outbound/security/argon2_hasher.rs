//! Argon2id password hashing.
//!
//! Hashing and verification run on tokio's blocking pool; one Argon2id pass
//! takes tens of milliseconds and would otherwise stall an HTTP worker.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use tracing::{debug, error};

use crate::domain::Password;
use crate::domain::ports::{CredentialHashError, CredentialHasher};

/// Well-formed Argon2id hash with default parameters that matches no
/// password. Verifying against it costs as much as a real check.
const UNKNOWN_ACCOUNT_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$dGltaW5nLW9yYWNsZS1kdW1teQ$K4VZh8k8YL3E8H7E8H7E8H7E8H7E8H7E8H7E8H7E8Hs";

/// [`CredentialHasher`] producing PHC-format Argon2id strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2CredentialHasher;

fn hash_blocking(password: &Password) -> Result<String, CredentialHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.expose().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| CredentialHashError::hash(err.to_string()))
}

fn verify_blocking(password: &Password, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(err) => {
            debug!(error = %err, "stored password hash is malformed");
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.expose().as_bytes(), &parsed)
        .is_ok()
}

#[async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    async fn hash(&self, password: &Password) -> Result<String, CredentialHashError> {
        let password = password.clone();
        tokio::task::spawn_blocking(move || hash_blocking(&password))
            .await
            .map_err(|err| CredentialHashError::hash(format!("hashing task failed: {err}")))?
    }

    async fn verify(&self, password: &Password, stored_hash: &str) -> bool {
        let password = password.clone();
        let stored_hash = stored_hash.to_owned();
        tokio::task::spawn_blocking(move || verify_blocking(&password, &stored_hash))
            .await
            .unwrap_or_else(|err| {
                error!(error = %err, "password verification task failed");
                false
            })
    }

    async fn verify_unknown(&self, password: &Password) {
        // Only the elapsed time matters here.
        let _ = self.verify(password, UNKNOWN_ACCOUNT_HASH).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn secret(raw: &str) -> Password {
        Password::new_secret(raw).expect("valid password")
    }

    #[rstest]
    #[tokio::test]
    async fn hashes_verify_only_the_original_password() {
        let hasher = Argon2CredentialHasher;
        let hash = hasher.hash(&secret("correct horse")).await.expect("hash");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(&secret("correct horse"), &hash).await);
        assert!(!hasher.verify(&secret("battery staple"), &hash).await);
    }

    #[rstest]
    #[tokio::test]
    async fn salts_differ_between_hashes() {
        let hasher = Argon2CredentialHasher;
        let first = hasher.hash(&secret("correct horse")).await.expect("hash");
        let second = hasher.hash(&secret("correct horse")).await.expect("hash");
        assert_ne!(first, second);
    }

    #[rstest]
    #[case("")]
    #[case("plain-text")]
    #[case("$argon2id$broken")]
    #[tokio::test]
    async fn malformed_hashes_never_match(#[case] stored: &str) {
        assert!(
            !Argon2CredentialHasher
                .verify(&secret("correct horse"), stored)
                .await
        );
    }

    #[rstest]
    fn unknown_account_hash_uses_the_default_parameters() {
        let parsed = PasswordHash::new(UNKNOWN_ACCOUNT_HASH).expect("well-formed hash");
        let defaults = Argon2::default();

        assert_eq!(parsed.algorithm, argon2::Algorithm::Argon2id.ident());
        assert_eq!(
            parsed.params.get_decimal("m"),
            Some(defaults.params().m_cost())
        );
        assert_eq!(
            parsed.params.get_decimal("t"),
            Some(defaults.params().t_cost())
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_accounts_still_run_a_verification() {
        Argon2CredentialHasher
            .verify_unknown(&secret("correct horse"))
            .await;
    }
}
