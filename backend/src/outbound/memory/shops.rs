//! `ShopRepository` over the in-memory state.

use std::cmp::Reverse;
use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    ApprovalOutcome, RejectionOutcome, ShopRepository, ShopRepositoryError,
};
use crate::domain::{
    ApplicationId, ApplicationStatus, DeletionSummary, PromotionId, PromotionalPost, Shop,
    ShopApplication, ShopId, UserId,
};

use super::{MemoryStore, Parent};

#[async_trait]
impl ShopRepository for MemoryStore {
    async fn create_application(
        &self,
        application: &ShopApplication,
    ) -> Result<(), ShopRepositoryError> {
        let mut state = self.state();
        state
            .require_parents(&[Parent::User(application.applicant_id)])
            .map_err(ShopRepositoryError::query)?;
        let pending = state.applications.values().any(|existing| {
            existing.applicant_id == application.applicant_id && existing.is_pending()
        });
        if pending && application.is_pending() {
            return Err(ShopRepositoryError::conflict(
                "applicant already has a pending application",
            ));
        }
        state
            .applications
            .insert(application.id, application.clone());
        Ok(())
    }

    async fn find_pending_application(
        &self,
        applicant_id: &UserId,
    ) -> Result<Option<ShopApplication>, ShopRepositoryError> {
        Ok(self
            .state()
            .applications
            .values()
            .find(|application| {
                application.applicant_id == *applicant_id && application.is_pending()
            })
            .cloned())
    }

    async fn list_applications_by_applicant(
        &self,
        applicant_id: &UserId,
    ) -> Result<Vec<ShopApplication>, ShopRepositoryError> {
        let mut applications: Vec<ShopApplication> = self
            .state()
            .applications
            .values()
            .filter(|application| application.applicant_id == *applicant_id)
            .cloned()
            .collect();
        applications.sort_by_key(|application| Reverse((application.created_at, application.id)));
        Ok(applications)
    }

    async fn list_applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<ShopApplication>, ShopRepositoryError> {
        let mut applications: Vec<ShopApplication> = self
            .state()
            .applications
            .values()
            .filter(|application| status.is_none_or(|status| application.status == status))
            .cloned()
            .collect();
        applications.sort_by_key(|application| (application.created_at, application.id));
        Ok(applications)
    }

    async fn approve_application(
        &self,
        id: &ApplicationId,
        at: DateTime<Utc>,
    ) -> Result<ApprovalOutcome, ShopRepositoryError> {
        let mut state = self.state();
        let Some(application) = state.applications.get(id) else {
            return Ok(ApprovalOutcome::NotFound);
        };
        if !application.is_pending() {
            return Ok(ApprovalOutcome::NotPending);
        }
        let applicant_id = application.applicant_id;
        if state.shops.values().any(|shop| shop.owner_id == applicant_id) {
            return Ok(ApprovalOutcome::AlreadyShopOwner);
        }

        let shop = application.to_shop(at);
        state.shops.insert(shop.id, shop.clone());
        if let Some(account) = state.users.get_mut(&applicant_id) {
            account.user.is_shop_owner = true;
        }
        if let Some(application) = state.applications.get_mut(id) {
            application.status = ApplicationStatus::Approved;
            application.reviewed_at = Some(at);
        }
        Ok(ApprovalOutcome::Approved(shop))
    }

    async fn reject_application(
        &self,
        id: &ApplicationId,
        note: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<RejectionOutcome, ShopRepositoryError> {
        let mut state = self.state();
        let Some(application) = state.applications.get_mut(id) else {
            return Ok(RejectionOutcome::NotFound);
        };
        if !application.is_pending() {
            return Ok(RejectionOutcome::NotPending);
        }
        application.status = ApplicationStatus::Rejected;
        application.review_note = note;
        application.reviewed_at = Some(at);
        Ok(RejectionOutcome::Rejected(application.clone()))
    }

    async fn find_shop(&self, id: &ShopId) -> Result<Option<Shop>, ShopRepositoryError> {
        Ok(self.state().shops.get(id).cloned())
    }

    async fn find_shop_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Option<Shop>, ShopRepositoryError> {
        Ok(self
            .state()
            .shops
            .values()
            .find(|shop| shop.owner_id == *owner_id)
            .cloned())
    }

    async fn list_shops(&self) -> Result<Vec<Shop>, ShopRepositoryError> {
        let mut shops: Vec<Shop> = self.state().shops.values().cloned().collect();
        shops.sort_by(|left, right| left.name.cmp(&right.name).then(left.id.cmp(&right.id)));
        Ok(shops)
    }

    async fn update_shop(&self, shop: &Shop) -> Result<bool, ShopRepositoryError> {
        let mut state = self.state();
        Ok(match state.shops.get_mut(&shop.id) {
            Some(stored) => {
                *stored = shop.clone();
                true
            }
            None => false,
        })
    }

    async fn delete_shop_cascade(
        &self,
        id: &ShopId,
    ) -> Result<Option<DeletionSummary>, ShopRepositoryError> {
        let mut state = self.state();
        if !state.shops.contains_key(id) {
            return Ok(None);
        }
        Ok(Some(state.delete_shops(&HashSet::from([*id]))))
    }

    async fn create_promotion(
        &self,
        promotion: &PromotionalPost,
    ) -> Result<(), ShopRepositoryError> {
        let mut state = self.state();
        state
            .require_parents(&[Parent::Shop(promotion.shop_id)])
            .map_err(ShopRepositoryError::query)?;
        state.promotions.insert(promotion.id, promotion.clone());
        Ok(())
    }

    async fn find_promotion(
        &self,
        id: &PromotionId,
    ) -> Result<Option<PromotionalPost>, ShopRepositoryError> {
        Ok(self.state().promotions.get(id).cloned())
    }

    async fn list_promotions(
        &self,
        shop_id: Option<ShopId>,
    ) -> Result<Vec<PromotionalPost>, ShopRepositoryError> {
        let mut promotions: Vec<PromotionalPost> = self
            .state()
            .promotions
            .values()
            .filter(|promotion| shop_id.is_none_or(|shop_id| promotion.shop_id == shop_id))
            .cloned()
            .collect();
        promotions.sort_by_key(|promotion| Reverse((promotion.created_at, promotion.id)));
        Ok(promotions)
    }

    async fn delete_promotion(&self, id: &PromotionId) -> Result<bool, ShopRepositoryError> {
        Ok(self.state().promotions.remove(id).is_some())
    }
}
