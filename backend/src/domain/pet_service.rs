//! Pet profile service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::access::{require_owner, require_owner_or_admin};
use crate::domain::ports::{PetRepository, PetService};
use crate::domain::{DeletionSummary, Error, Pet, PetDraft, PetId, PetPatch, User};

/// Pet service implementing [`PetService`].
#[derive(Clone)]
pub struct PetServiceImpl<P> {
    pets: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<P> PetServiceImpl<P> {
    /// Create a new service.
    pub fn new(pets: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self { pets, clock }
    }
}

impl<P> PetServiceImpl<P>
where
    P: PetRepository,
{
    async fn find(&self, id: &PetId) -> Result<Pet, Error> {
        self.pets
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("pet not found"))
    }
}

#[async_trait]
impl<P> PetService for PetServiceImpl<P>
where
    P: PetRepository,
{
    async fn list_mine(&self, actor: &User) -> Result<Vec<Pet>, Error> {
        Ok(self.pets.list_by_owner(&actor.id).await?)
    }

    async fn create(&self, actor: &User, draft: PetDraft) -> Result<Pet, Error> {
        let now = self.clock.utc();
        draft.ensure_born_by(now.date_naive())?;
        let pet = draft.into_pet(actor.id, now);
        self.pets.create(&pet).await?;
        info!(user_id = %actor.id, pet_id = %pet.id, "pet registered");
        Ok(pet)
    }

    async fn get(&self, id: &PetId) -> Result<Pet, Error> {
        self.find(id).await
    }

    async fn update(&self, actor: &User, id: &PetId, patch: PetPatch) -> Result<Pet, Error> {
        let mut pet = self.find(id).await?;
        require_owner(actor, &pet.owner_id, "pet")?;
        let now = self.clock.utc();
        patch.ensure_born_by(now.date_naive())?;
        pet.apply(patch, now);
        if !self.pets.update(&pet).await? {
            return Err(Error::not_found("pet not found"));
        }
        Ok(pet)
    }

    async fn delete(&self, actor: &User, id: &PetId) -> Result<DeletionSummary, Error> {
        let pet = self.find(id).await?;
        require_owner_or_admin(actor, &pet.owner_id, "pet")?;
        let summary = self
            .pets
            .delete_cascade(id)
            .await?
            .ok_or_else(|| Error::not_found("pet not found"))?;
        info!(
            user_id = %actor.id,
            pet_id = %id,
            rows = summary.total(),
            "pet deleted"
        );
        Ok(summary)
    }
}
