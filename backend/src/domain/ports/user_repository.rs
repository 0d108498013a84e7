//! Port for account persistence and account-wide cascades.

use async_trait::async_trait;

use crate::domain::{DeletionSummary, Email, PlatformStats, StoredCredentials, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique column (`email` or `username`) already holds the value.
        Duplicate { field: String } => "user {field} is already registered",
    }
}

/// Port for reading and writing user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account with its password hash.
    ///
    /// Fails with [`UserRepositoryError::Duplicate`] when the email or
    /// username is taken.
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), UserRepositoryError>;

    /// Find an account by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Find an account and its password hash by normalised email.
    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;

    /// Overwrite the profile fields and role flags. Returns `false` when the
    /// account no longer exists.
    async fn update(&self, user: &User) -> Result<bool, UserRepositoryError>;

    /// List every account, oldest first.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Delete an account and everything it owns in one transaction.
    ///
    /// Order: likes given, replies written, comments written (with their
    /// replies), the user's posts (with likes, comments and replies), tasks,
    /// health records of the user's pets, pets, the shop's promotions, the
    /// shop, shop applications, then the user. Returns `None` when the
    /// account does not exist.
    async fn delete_cascade(
        &self,
        id: &UserId,
    ) -> Result<Option<DeletionSummary>, UserRepositoryError>;

    /// Platform-wide counters.
    async fn stats(&self) -> Result<PlatformStats, UserRepositoryError>;
}
