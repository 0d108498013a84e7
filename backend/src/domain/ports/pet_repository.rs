//! Port for pet persistence.

use async_trait::async_trait;

use crate::domain::{DeletionSummary, Pet, PetId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by pet repository adapters.
    pub enum PetRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "pet repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "pet repository query failed: {message}",
    }
}

/// Port for reading and writing pets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetRepository: Send + Sync {
    /// Insert a new pet.
    async fn create(&self, pet: &Pet) -> Result<(), PetRepositoryError>;

    /// Find a pet by id.
    async fn find_by_id(&self, id: &PetId) -> Result<Option<Pet>, PetRepositoryError>;

    /// List an owner's pets, newest first.
    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Pet>, PetRepositoryError>;

    /// Overwrite a pet's editable fields. Returns `false` when it is gone.
    async fn update(&self, pet: &Pet) -> Result<bool, PetRepositoryError>;

    /// Delete a pet with its medical records, vaccinations and tasks in one
    /// transaction. Posts tagging the pet are kept and untagged. Returns
    /// `None` when the pet does not exist.
    async fn delete_cascade(
        &self,
        id: &PetId,
    ) -> Result<Option<DeletionSummary>, PetRepositoryError>;
}
