//! Port for shop applications, shops and promotions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    ApplicationId, ApplicationStatus, DeletionSummary, PromotionId, PromotionalPost, Shop,
    ShopApplication, ShopId, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by shop repository adapters.
    pub enum ShopRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "shop repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "shop repository query failed: {message}",
        /// A uniqueness rule rejected the write.
        Conflict { message: String } => "shop repository conflict: {message}",
    }
}

/// Result of approving an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// The shop was created and the applicant flagged as a shop owner.
    Approved(Shop),
    /// No application has that id.
    NotFound,
    /// The application was already reviewed.
    NotPending,
    /// The applicant already owns a shop.
    AlreadyShopOwner,
}

/// Result of rejecting an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionOutcome {
    /// The application is now rejected.
    Rejected(ShopApplication),
    /// No application has that id.
    NotFound,
    /// The application was already reviewed.
    NotPending,
}

/// Port for the shop workflow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShopRepository: Send + Sync {
    /// Insert a pending application. Fails with
    /// [`ShopRepositoryError::Conflict`] if the applicant already has one.
    async fn create_application(
        &self,
        application: &ShopApplication,
    ) -> Result<(), ShopRepositoryError>;

    /// The applicant's pending application, if any.
    async fn find_pending_application(
        &self,
        applicant_id: &UserId,
    ) -> Result<Option<ShopApplication>, ShopRepositoryError>;

    /// An applicant's applications, newest first.
    async fn list_applications_by_applicant(
        &self,
        applicant_id: &UserId,
    ) -> Result<Vec<ShopApplication>, ShopRepositoryError>;

    /// All applications, optionally filtered by status, oldest first.
    async fn list_applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<ShopApplication>, ShopRepositoryError>;

    /// Approve a pending application in one transaction: create the shop,
    /// flag the applicant as a shop owner and mark the application approved.
    async fn approve_application(
        &self,
        id: &ApplicationId,
        at: DateTime<Utc>,
    ) -> Result<ApprovalOutcome, ShopRepositoryError>;

    /// Reject a pending application with an optional note.
    async fn reject_application(
        &self,
        id: &ApplicationId,
        note: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<RejectionOutcome, ShopRepositoryError>;

    /// Find a shop by id.
    async fn find_shop(&self, id: &ShopId) -> Result<Option<Shop>, ShopRepositoryError>;

    /// Find the shop owned by a user.
    async fn find_shop_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Option<Shop>, ShopRepositoryError>;

    /// All shops ordered by name.
    async fn list_shops(&self) -> Result<Vec<Shop>, ShopRepositoryError>;

    /// Overwrite a shop's editable fields. Returns `false` when it is gone.
    async fn update_shop(&self, shop: &Shop) -> Result<bool, ShopRepositoryError>;

    /// Delete a shop and its promotions, then clear the owner's shop flag,
    /// in one transaction. Returns `None` when the shop does not exist.
    async fn delete_shop_cascade(
        &self,
        id: &ShopId,
    ) -> Result<Option<DeletionSummary>, ShopRepositoryError>;

    /// Insert a promotion.
    async fn create_promotion(&self, promotion: &PromotionalPost)
    -> Result<(), ShopRepositoryError>;

    /// Find a promotion by id.
    async fn find_promotion(
        &self,
        id: &PromotionId,
    ) -> Result<Option<PromotionalPost>, ShopRepositoryError>;

    /// Promotions, optionally for one shop, newest first.
    async fn list_promotions(
        &self,
        shop_id: Option<ShopId>,
    ) -> Result<Vec<PromotionalPost>, ShopRepositoryError>;

    /// Delete a promotion. Returns `false` when it is gone.
    async fn delete_promotion(&self, id: &PromotionId) -> Result<bool, ShopRepositoryError>;
}
