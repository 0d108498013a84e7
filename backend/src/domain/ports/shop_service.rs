//! Driving port for shop applications, shops and promotions.

use async_trait::async_trait;

use crate::domain::{
    Error, PromotionDraft, PromotionId, PromotionalPost, Shop, ShopApplication,
    ShopApplicationDraft, ShopId, ShopPatch, User,
};

/// Shop workflow as seen by regular users and shop owners.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShopService: Send + Sync {
    /// Ask to open a shop.
    async fn apply(
        &self,
        actor: &User,
        draft: ShopApplicationDraft,
    ) -> Result<ShopApplication, Error>;

    /// The caller's applications, newest first.
    async fn my_applications(&self, actor: &User) -> Result<Vec<ShopApplication>, Error>;

    /// All shops by name.
    async fn list_shops(&self) -> Result<Vec<Shop>, Error>;

    /// The caller's shop.
    async fn my_shop(&self, actor: &User) -> Result<Shop, Error>;

    /// Fetch any shop.
    async fn get_shop(&self, id: &ShopId) -> Result<Shop, Error>;

    /// Edit the caller's shop.
    async fn update_shop(&self, actor: &User, id: &ShopId, patch: ShopPatch)
    -> Result<Shop, Error>;

    /// Promotions, optionally for one shop, newest first.
    async fn list_promotions(&self, shop_id: Option<ShopId>)
    -> Result<Vec<PromotionalPost>, Error>;

    /// Publish a promotion for the caller's shop.
    async fn create_promotion(
        &self,
        actor: &User,
        draft: PromotionDraft,
    ) -> Result<PromotionalPost, Error>;

    /// Remove a promotion as the shop owner or an admin.
    async fn delete_promotion(&self, actor: &User, id: &PromotionId) -> Result<(), Error>;
}
