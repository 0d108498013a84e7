//! Driving ports for registration, login and profile management.
//!
//! Inbound adapters call these use-cases without knowing how accounts are
//! stored or how tokens are signed.

use async_trait::async_trait;

use crate::domain::{
    AuthSession, DeletionSummary, Error, LoginCredentials, Pet, ProfilePatch, PublicProfile,
    Registration, User, UserId,
};

/// Registration, login and bearer token resolution.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and sign the caller in.
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error>;

    /// Exchange credentials for a token.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error>;

    /// Resolve a bearer token to the current account row.
    async fn authenticate(&self, token: &str) -> Result<User, Error>;
}

/// Profile reads and self-service account changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Apply a profile patch to the caller's account.
    async fn update_profile(&self, actor: &User, patch: ProfilePatch) -> Result<User, Error>;

    /// Delete the caller's account and everything it owns.
    async fn delete_account(&self, actor: &User) -> Result<DeletionSummary, Error>;

    /// Public view of any account.
    async fn public_profile(&self, id: &UserId) -> Result<PublicProfile, Error>;

    /// Pets owned by any account.
    async fn user_pets(&self, id: &UserId) -> Result<Vec<Pet>, Error>;
}
