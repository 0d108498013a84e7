//! Port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::Password;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum CredentialHashError {
        /// The hashing primitive rejected its input or parameters.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// Hashes new passwords and checks presented ones against stored hashes.
///
/// Implementations are expected to be slow on purpose; adapters keep that
/// work off the async executor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Produce a self-describing hash string suitable for storage.
    async fn hash(&self, password: &Password) -> Result<String, CredentialHashError>;

    /// Return `true` when `password` matches `stored_hash`. Malformed hashes
    /// never match.
    async fn verify(&self, password: &Password, stored_hash: &str) -> bool;

    /// Spend the cost of one [`verify`](Self::verify) for an account that
    /// does not exist, so unknown emails answer as slowly as wrong passwords.
    async fn verify_unknown(&self, password: &Password);
}
