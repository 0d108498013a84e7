//! Driving port for platform administration.
//!
//! Every operation checks that `actor` is an administrator before touching
//! any data.

use async_trait::async_trait;

use crate::domain::{
    ApplicationId, ApplicationStatus, DeletionSummary, Error, PlatformStats, PostId, Shop,
    ShopApplication, ShopId, User, UserId,
};

/// Moderation and shop review.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminService: Send + Sync {
    /// Every account, oldest first.
    async fn list_users(&self, actor: &User) -> Result<Vec<User>, Error>;

    /// Grant or revoke the admin flag.
    async fn set_admin(&self, actor: &User, target: &UserId, is_admin: bool)
    -> Result<User, Error>;

    /// Delete another account with the full cascade.
    async fn delete_user(&self, actor: &User, target: &UserId) -> Result<DeletionSummary, Error>;

    /// Delete any post with its engagement.
    async fn delete_post(&self, actor: &User, id: &PostId) -> Result<DeletionSummary, Error>;

    /// Applications, optionally filtered by status.
    async fn list_applications(
        &self,
        actor: &User,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<ShopApplication>, Error>;

    /// Approve a pending application and open the shop.
    async fn approve_application(&self, actor: &User, id: &ApplicationId) -> Result<Shop, Error>;

    /// Reject a pending application.
    async fn reject_application(
        &self,
        actor: &User,
        id: &ApplicationId,
        note: Option<String>,
    ) -> Result<ShopApplication, Error>;

    /// Close a shop and drop its promotions.
    async fn delete_shop(&self, actor: &User, id: &ShopId) -> Result<DeletionSummary, Error>;

    /// Platform counters.
    async fn stats(&self, actor: &User) -> Result<PlatformStats, Error>;
}
