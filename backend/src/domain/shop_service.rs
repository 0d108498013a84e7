//! Shop applications, shop profiles and promotions.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::access::{require_owner, require_owner_or_admin, with_reason};
use crate::domain::ports::{ShopRepository, ShopRepositoryError, ShopService};
use crate::domain::{
    Error, PromotionDraft, PromotionId, PromotionalPost, Shop, ShopApplication,
    ShopApplicationDraft, ShopId, ShopPatch, User,
};

/// Shop service implementing [`ShopService`].
#[derive(Clone)]
pub struct ShopServiceImpl<S> {
    shops: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> ShopServiceImpl<S> {
    /// Create a new service.
    pub fn new(shops: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { shops, clock }
    }
}

fn shop_not_found() -> Error {
    Error::not_found("shop not found")
}

fn application_pending() -> Error {
    with_reason(
        Error::conflict("an application is already pending review"),
        "application_pending",
    )
}

impl<S> ShopServiceImpl<S>
where
    S: ShopRepository,
{
    async fn find_shop(&self, id: &ShopId) -> Result<Shop, Error> {
        self.shops.find_shop(id).await?.ok_or_else(shop_not_found)
    }
}

#[async_trait]
impl<S> ShopService for ShopServiceImpl<S>
where
    S: ShopRepository,
{
    async fn apply(
        &self,
        actor: &User,
        draft: ShopApplicationDraft,
    ) -> Result<ShopApplication, Error> {
        if actor.is_shop_owner {
            return Err(with_reason(
                Error::conflict("you already own a shop"),
                "already_shop_owner",
            ));
        }
        if self
            .shops
            .find_pending_application(&actor.id)
            .await?
            .is_some()
        {
            return Err(application_pending());
        }
        let application = draft.into_application(actor.id, self.clock.utc());
        match self.shops.create_application(&application).await {
            Ok(()) => {}
            // A concurrent submission won the partial unique index.
            Err(ShopRepositoryError::Conflict { .. }) => return Err(application_pending()),
            Err(other) => return Err(other.into()),
        }
        info!(
            user_id = %actor.id,
            application_id = %application.id,
            "shop application submitted"
        );
        Ok(application)
    }

    async fn my_applications(&self, actor: &User) -> Result<Vec<ShopApplication>, Error> {
        Ok(self.shops.list_applications_by_applicant(&actor.id).await?)
    }

    async fn list_shops(&self) -> Result<Vec<Shop>, Error> {
        Ok(self.shops.list_shops().await?)
    }

    async fn my_shop(&self, actor: &User) -> Result<Shop, Error> {
        self.shops
            .find_shop_by_owner(&actor.id)
            .await?
            .ok_or_else(|| Error::not_found("you do not own a shop"))
    }

    async fn get_shop(&self, id: &ShopId) -> Result<Shop, Error> {
        self.find_shop(id).await
    }

    async fn update_shop(
        &self,
        actor: &User,
        id: &ShopId,
        patch: ShopPatch,
    ) -> Result<Shop, Error> {
        let mut shop = self.find_shop(id).await?;
        require_owner(actor, &shop.owner_id, "shop")?;
        shop.apply(patch, self.clock.utc());
        if !self.shops.update_shop(&shop).await? {
            return Err(shop_not_found());
        }
        Ok(shop)
    }

    async fn list_promotions(
        &self,
        shop_id: Option<ShopId>,
    ) -> Result<Vec<PromotionalPost>, Error> {
        Ok(self.shops.list_promotions(shop_id).await?)
    }

    async fn create_promotion(
        &self,
        actor: &User,
        draft: PromotionDraft,
    ) -> Result<PromotionalPost, Error> {
        if !actor.is_shop_owner {
            return Err(Error::forbidden("only shop owners can publish promotions"));
        }
        let shop = self
            .shops
            .find_shop_by_owner(&actor.id)
            .await?
            .ok_or_else(|| Error::forbidden("only shop owners can publish promotions"))?;
        let promotion = draft.into_promotion(shop.id, self.clock.utc());
        self.shops.create_promotion(&promotion).await?;
        Ok(promotion)
    }

    async fn delete_promotion(&self, actor: &User, id: &PromotionId) -> Result<(), Error> {
        let promotion = self
            .shops
            .find_promotion(id)
            .await?
            .ok_or_else(|| Error::not_found("promotion not found"))?;
        let shop = self.find_shop(&promotion.shop_id).await?;
        require_owner_or_admin(actor, &shop.owner_id, "promotion")?;
        if !self.shops.delete_promotion(id).await? {
            return Err(Error::not_found("promotion not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockShopRepository;
    use crate::domain::test_fixtures::{fixture_clock, fixture_timestamp, user};
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use serde_json::json;

    fn draft() -> ShopApplicationDraft {
        ShopApplicationDraft::try_from_parts("Paws & Co", None, None, None).expect("draft")
    }

    fn reason(error: &Error) -> Option<&serde_json::Value> {
        error.details().and_then(|details| details.get("code"))
    }

    fn shop_owned_by(owner: &User) -> Shop {
        draft()
            .into_application(owner.id, fixture_timestamp())
            .to_shop(fixture_timestamp())
    }

    #[rstest]
    #[tokio::test]
    async fn shop_owners_cannot_apply_again() {
        let mut shops = MockShopRepository::new();
        shops.expect_find_pending_application().times(0);
        let mut owner = user("owner");
        owner.is_shop_owner = true;

        let error = ShopServiceImpl::new(Arc::new(shops), fixture_clock())
            .apply(&owner, draft())
            .await
            .expect_err("conflict");

        assert_eq!(error.code(), ErrorCode::Conflict);
        assert_eq!(reason(&error), Some(&json!("already_shop_owner")));
    }

    #[rstest]
    #[case::existing_pending(true, false)]
    #[case::lost_race(false, true)]
    #[tokio::test]
    async fn pending_application_blocks_another(
        #[case] pending_found: bool,
        #[case] insert_conflicts: bool,
    ) {
        let applicant = user("applicant");
        let existing = draft().into_application(applicant.id, fixture_timestamp());
        let mut shops = MockShopRepository::new();
        shops
            .expect_find_pending_application()
            .return_once(move |_| Ok(pending_found.then_some(existing)));
        shops
            .expect_create_application()
            .times(usize::from(insert_conflicts))
            .returning(|_| Err(ShopRepositoryError::conflict("pending application exists")));

        let error = ShopServiceImpl::new(Arc::new(shops), fixture_clock())
            .apply(&applicant, draft())
            .await
            .expect_err("conflict");

        assert_eq!(error.code(), ErrorCode::Conflict);
        assert_eq!(reason(&error), Some(&json!("application_pending")));
    }

    #[rstest]
    #[tokio::test]
    async fn promotions_need_the_shop_owner_flag() {
        let mut shops = MockShopRepository::new();
        shops.expect_find_shop_by_owner().times(0);
        let draft = PromotionDraft::try_from_parts("Sale", "Half price", None).expect("draft");

        let error = ShopServiceImpl::new(Arc::new(shops), fixture_clock())
            .create_promotion(&user("plain"), draft)
            .await
            .expect_err("forbidden");

        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn promotion_is_attached_to_callers_shop() {
        let mut owner = user("owner");
        owner.is_shop_owner = true;
        let shop = shop_owned_by(&owner);
        let shop_id = shop.id;
        let mut shops = MockShopRepository::new();
        shops
            .expect_find_shop_by_owner()
            .return_once(move |_| Ok(Some(shop)));
        shops
            .expect_create_promotion()
            .withf(move |promotion| promotion.shop_id == shop_id)
            .times(1)
            .return_once(|_| Ok(()));
        let draft = PromotionDraft::try_from_parts("Sale", "Half price", None).expect("draft");

        let promotion = ShopServiceImpl::new(Arc::new(shops), fixture_clock())
            .create_promotion(&owner, draft)
            .await
            .expect("created");

        assert_eq!(promotion.shop_id, shop_id);
        assert_eq!(promotion.created_at, fixture_timestamp());
    }

    #[rstest]
    #[tokio::test]
    async fn strangers_cannot_edit_a_shop() {
        let shop = shop_owned_by(&user("owner"));
        let mut shops = MockShopRepository::new();
        shops.expect_find_shop().return_once(move |_| Ok(Some(shop)));
        shops.expect_update_shop().times(0);

        let error = ShopServiceImpl::new(Arc::new(shops), fixture_clock())
            .update_shop(&user("stranger"), &ShopId::random(), ShopPatch::default())
            .await
            .expect_err("forbidden");

        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn my_shop_is_not_found_without_one() {
        let mut shops = MockShopRepository::new();
        shops.expect_find_shop_by_owner().return_once(|_| Ok(None));

        let error = ShopServiceImpl::new(Arc::new(shops), fixture_clock())
            .my_shop(&user("plain"))
            .await
            .expect_err("missing");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
