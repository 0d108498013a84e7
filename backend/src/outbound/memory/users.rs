//! `UserRepository` over the in-memory state.

use async_trait::async_trait;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{
    ApplicationStatus, DeletionSummary, Email, PlatformStats, StoredCredentials, User, UserId,
};

use super::{Account, MemoryStore, count};

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), UserRepositoryError> {
        let mut state = self.state();
        let accounts = state.users.values().map(|account| &account.user);
        for existing in accounts {
            if existing.email == user.email {
                return Err(UserRepositoryError::duplicate("email"));
            }
            if existing.username == user.username {
                return Err(UserRepositoryError::duplicate("username"));
            }
        }
        state.users.insert(
            user.id,
            Account {
                user: user.clone(),
                password_hash: password_hash.to_owned(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.state().users.get(id).map(|account| account.user.clone()))
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        Ok(self
            .state()
            .users
            .values()
            .find(|account| account.user.email == *email)
            .map(|account| StoredCredentials {
                user: account.user.clone(),
                password_hash: account.password_hash.clone(),
            }))
    }

    async fn update(&self, user: &User) -> Result<bool, UserRepositoryError> {
        let mut state = self.state();
        Ok(match state.users.get_mut(&user.id) {
            Some(account) => {
                account.user = user.clone();
                true
            }
            None => false,
        })
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut users: Vec<User> = self
            .state()
            .users
            .values()
            .map(|account| account.user.clone())
            .collect();
        users.sort_by_key(|user| (user.created_at, user.id));
        Ok(users)
    }

    async fn delete_cascade(
        &self,
        id: &UserId,
    ) -> Result<Option<DeletionSummary>, UserRepositoryError> {
        let mut state = self.state();
        if !state.users.contains_key(id) {
            return Ok(None);
        }
        Ok(Some(state.delete_user(*id)))
    }

    async fn stats(&self) -> Result<PlatformStats, UserRepositoryError> {
        let state = self.state();
        Ok(PlatformStats {
            users: count(state.users.len()),
            pets: count(state.pets.len()),
            posts: count(state.posts.len()),
            comments: count(state.comments.len()),
            shops: count(state.shops.len()),
            pending_applications: count(
                state
                    .applications
                    .values()
                    .filter(|application| application.status == ApplicationStatus::Pending)
                    .count(),
            ),
        })
    }
}
