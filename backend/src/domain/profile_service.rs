//! Self-service profile management and public profile reads.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{PetRepository, ProfileService, UserRepository};
use crate::domain::{DeletionSummary, Error, Pet, ProfilePatch, PublicProfile, User, UserId};

/// Profile service implementing [`ProfileService`].
#[derive(Clone)]
pub struct ProfileServiceImpl<U, P> {
    users: Arc<U>,
    pets: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<U, P> ProfileServiceImpl<U, P> {
    /// Create a new service.
    pub fn new(users: Arc<U>, pets: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self { users, pets, clock }
    }
}

fn user_not_found() -> Error {
    Error::not_found("user not found")
}

#[async_trait]
impl<U, P> ProfileService for ProfileServiceImpl<U, P>
where
    U: UserRepository,
    P: PetRepository,
{
    async fn update_profile(&self, actor: &User, patch: ProfilePatch) -> Result<User, Error> {
        let mut user = actor.clone();
        user.apply(patch, self.clock.utc());
        if !self.users.update(&user).await? {
            return Err(user_not_found());
        }
        Ok(user)
    }

    async fn delete_account(&self, actor: &User) -> Result<DeletionSummary, Error> {
        let summary = self
            .users
            .delete_cascade(&actor.id)
            .await?
            .ok_or_else(user_not_found)?;
        info!(user_id = %actor.id, rows = summary.total(), "account deleted by owner");
        Ok(summary)
    }

    async fn public_profile(&self, id: &UserId) -> Result<PublicProfile, Error> {
        self.users
            .find_by_id(id)
            .await?
            .map(|user| user.public_profile())
            .ok_or_else(user_not_found)
    }

    async fn user_pets(&self, id: &UserId) -> Result<Vec<Pet>, Error> {
        if self.users.find_by_id(id).await?.is_none() {
            return Err(user_not_found());
        }
        Ok(self.pets.list_by_owner(id).await?)
    }
}
