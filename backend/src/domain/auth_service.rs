//! Registration, login and bearer token resolution.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{AuthService, CredentialHasher, TokenIssuer, UserRepository};
use crate::domain::{AuthSession, Email, Error, LoginCredentials, Registration, User, UserId};

const INVALID_CREDENTIALS: &str = "invalid credentials";
const INVALID_TOKEN: &str = "invalid token";

/// Account authentication service implementing [`AuthService`].
#[derive(Clone)]
pub struct AuthServiceImpl<U> {
    users: Arc<U>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenIssuer>,
    clock: Arc<dyn Clock>,
    bootstrap_admin: Option<Email>,
}

impl<U> AuthServiceImpl<U> {
    /// Create a new service.
    pub fn new(
        users: Arc<U>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenIssuer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
            bootstrap_admin: None,
        }
    }

    /// Register accounts using `email` as administrators.
    #[must_use]
    pub fn with_bootstrap_admin(mut self, email: Option<Email>) -> Self {
        self.bootstrap_admin = email;
        self
    }

    fn issue_session(&self, user: User, now: DateTime<Utc>) -> Result<AuthSession, Error> {
        let token = self
            .tokens
            .issue(&user, now)
            .map_err(|err| Error::internal(format!("failed to issue token: {err}")))?;
        Ok(AuthSession { token, user })
    }
}

#[async_trait]
impl<U> AuthService for AuthServiceImpl<U>
where
    U: UserRepository,
{
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let Registration {
            email,
            username,
            display_name,
            password,
        } = registration;
        let password_hash = self.hasher.hash(&password).await?;
        let now = self.clock.utc();
        let is_admin = self.bootstrap_admin.as_ref() == Some(&email);
        let user = User {
            id: UserId::random(),
            email,
            username,
            display_name,
            bio: None,
            avatar_url: None,
            is_admin,
            is_shop_owner: false,
            created_at: now,
            updated_at: now,
        };

        self.users.create(&user, &password_hash).await?;
        info!(user_id = %user.id, is_admin, "account registered");
        self.issue_session(user, now)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error> {
        let Some(stored) = self.users.find_credentials(&credentials.email).await? else {
            debug!("login for unknown email");
            self.hasher.verify_unknown(&credentials.password).await;
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        if !self
            .hasher
            .verify(&credentials.password, &stored.password_hash)
            .await
        {
            warn!(user_id = %stored.user.id, "login with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        self.issue_session(stored.user, self.clock.utc())
    }

    async fn authenticate(&self, token: &str) -> Result<User, Error> {
        let claims = self.tokens.verify(token).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            Error::unauthorized(INVALID_TOKEN)
        })?;
        self.users
            .find_by_id(&claims.user_id)
            .await?
            .ok_or_else(|| Error::unauthorized(INVALID_TOKEN))
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
