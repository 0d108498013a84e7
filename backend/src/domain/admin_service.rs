//! Platform administration: moderation, shop review and statistics.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::access::{require_admin, with_reason};
use crate::domain::ports::{
    AdminService, ApprovalOutcome, PostRepository, RejectionOutcome, ShopRepository,
    UserRepository,
};
use crate::domain::{
    ApplicationId, ApplicationStatus, DeletionSummary, Error, PlatformStats, PostId, Shop,
    ShopApplication, ShopId, User, UserId, review_note,
};

/// Admin service implementing [`AdminService`].
#[derive(Clone)]
pub struct AdminServiceImpl<U, Po, S> {
    users: Arc<U>,
    posts: Arc<Po>,
    shops: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<U, Po, S> AdminServiceImpl<U, Po, S> {
    /// Create a new service.
    pub fn new(users: Arc<U>, posts: Arc<Po>, shops: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            posts,
            shops,
            clock,
        }
    }
}

fn user_not_found() -> Error {
    Error::not_found("user not found")
}

fn application_not_found() -> Error {
    Error::not_found("application not found")
}

fn not_pending() -> Error {
    with_reason(
        Error::conflict("application has already been reviewed"),
        "application_not_pending",
    )
}

#[async_trait]
impl<U, Po, S> AdminService for AdminServiceImpl<U, Po, S>
where
    U: UserRepository,
    Po: PostRepository,
    S: ShopRepository,
{
    async fn list_users(&self, actor: &User) -> Result<Vec<User>, Error> {
        require_admin(actor)?;
        Ok(self.users.list().await?)
    }

    async fn set_admin(
        &self,
        actor: &User,
        target: &UserId,
        is_admin: bool,
    ) -> Result<User, Error> {
        require_admin(actor)?;
        if actor.id == *target && !is_admin {
            return Err(with_reason(
                Error::invalid_request("admins cannot revoke their own admin flag"),
                "self_demotion",
            ));
        }
        let mut user = self
            .users
            .find_by_id(target)
            .await?
            .ok_or_else(user_not_found)?;
        user.is_admin = is_admin;
        user.updated_at = self.clock.utc();
        if !self.users.update(&user).await? {
            return Err(user_not_found());
        }
        info!(admin_id = %actor.id, user_id = %target, is_admin, "admin flag changed");
        Ok(user)
    }

    async fn delete_user(&self, actor: &User, target: &UserId) -> Result<DeletionSummary, Error> {
        require_admin(actor)?;
        if actor.id == *target {
            return Err(with_reason(
                Error::invalid_request("admins cannot delete their own account here"),
                "self_deletion",
            ));
        }
        let summary = self
            .users
            .delete_cascade(target)
            .await?
            .ok_or_else(user_not_found)?;
        info!(admin_id = %actor.id, user_id = %target, rows = summary.total(), "user deleted");
        Ok(summary)
    }

    async fn delete_post(&self, actor: &User, id: &PostId) -> Result<DeletionSummary, Error> {
        require_admin(actor)?;
        let summary = self
            .posts
            .delete_post_cascade(id)
            .await?
            .ok_or_else(|| Error::not_found("post not found"))?;
        info!(admin_id = %actor.id, post_id = %id, rows = summary.total(), "post removed");
        Ok(summary)
    }

    async fn list_applications(
        &self,
        actor: &User,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<ShopApplication>, Error> {
        require_admin(actor)?;
        Ok(self.shops.list_applications(status).await?)
    }

    async fn approve_application(&self, actor: &User, id: &ApplicationId) -> Result<Shop, Error> {
        require_admin(actor)?;
        match self.shops.approve_application(id, self.clock.utc()).await? {
            ApprovalOutcome::Approved(shop) => {
                info!(
                    admin_id = %actor.id,
                    application_id = %id,
                    shop_id = %shop.id,
                    "shop application approved"
                );
                Ok(shop)
            }
            ApprovalOutcome::NotFound => Err(application_not_found()),
            ApprovalOutcome::NotPending => Err(not_pending()),
            ApprovalOutcome::AlreadyShopOwner => Err(with_reason(
                Error::conflict("applicant already owns a shop"),
                "already_shop_owner",
            )),
        }
    }

    async fn reject_application(
        &self,
        actor: &User,
        id: &ApplicationId,
        note: Option<String>,
    ) -> Result<ShopApplication, Error> {
        require_admin(actor)?;
        let note = review_note(note.as_deref())?;
        match self
            .shops
            .reject_application(id, note, self.clock.utc())
            .await?
        {
            RejectionOutcome::Rejected(application) => {
                info!(admin_id = %actor.id, application_id = %id, "shop application rejected");
                Ok(application)
            }
            RejectionOutcome::NotFound => Err(application_not_found()),
            RejectionOutcome::NotPending => Err(not_pending()),
        }
    }

    async fn delete_shop(&self, actor: &User, id: &ShopId) -> Result<DeletionSummary, Error> {
        require_admin(actor)?;
        let summary = self
            .shops
            .delete_shop_cascade(id)
            .await?
            .ok_or_else(|| Error::not_found("shop not found"))?;
        info!(admin_id = %actor.id, shop_id = %id, rows = summary.total(), "shop removed");
        Ok(summary)
    }

    async fn stats(&self, actor: &User) -> Result<PlatformStats, Error> {
        require_admin(actor)?;
        Ok(self.users.stats().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockPostRepository, MockShopRepository, MockUserRepository};
    use crate::domain::test_fixtures::{admin, fixture_clock, user};
    use crate::domain::ErrorCode;
    use rstest::{fixture, rstest};
    use serde_json::json;

    type Service = AdminServiceImpl<MockUserRepository, MockPostRepository, MockShopRepository>;

    fn make_service(users: MockUserRepository, shops: MockShopRepository) -> Service {
        AdminServiceImpl::new(
            Arc::new(users),
            Arc::new(MockPostRepository::new()),
            Arc::new(shops),
            fixture_clock(),
        )
    }

    #[fixture]
    fn moderator() -> User {
        admin("moderator")
    }

    fn reason(error: &Error) -> Option<&serde_json::Value> {
        error.details().and_then(|details| details.get("code"))
    }

    #[rstest]
    #[tokio::test]
    async fn plain_users_cannot_read_stats() {
        let mut users = MockUserRepository::new();
        users.expect_stats().times(0);

        let error = make_service(users, MockShopRepository::new())
            .stats(&user("plain"))
            .await
            .expect_err("forbidden");

        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn admins_cannot_demote_themselves(moderator: User) {
        let mut users = MockUserRepository::new();
        users.expect_update().times(0);
        let own_id = moderator.id;

        let error = make_service(users, MockShopRepository::new())
            .set_admin(&moderator, &own_id, false)
            .await
            .expect_err("self demotion");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(reason(&error), Some(&json!("self_demotion")));
    }

    #[rstest]
    #[tokio::test]
    async fn admins_cannot_delete_themselves(moderator: User) {
        let mut users = MockUserRepository::new();
        users.expect_delete_cascade().times(0);
        let own_id = moderator.id;

        let error = make_service(users, MockShopRepository::new())
            .delete_user(&moderator, &own_id)
            .await
            .expect_err("self deletion");

        assert_eq!(reason(&error), Some(&json!("self_deletion")));
    }

    #[rstest]
    #[tokio::test]
    async fn promoting_a_user_persists_the_flag(moderator: User) {
        let target = user("helper");
        let target_id = target.id;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(target)));
        users
            .expect_update()
            .withf(|user| user.is_admin)
            .times(1)
            .return_once(|_| Ok(true));

        let promoted = make_service(users, MockShopRepository::new())
            .set_admin(&moderator, &target_id, true)
            .await
            .expect("promoted");

        assert!(promoted.is_admin);
    }

    #[rstest]
    #[case::missing(ApprovalOutcome::NotFound, ErrorCode::NotFound, None)]
    #[case::reviewed(
        ApprovalOutcome::NotPending,
        ErrorCode::Conflict,
        Some("application_not_pending")
    )]
    #[case::owner(
        ApprovalOutcome::AlreadyShopOwner,
        ErrorCode::Conflict,
        Some("already_shop_owner")
    )]
    #[tokio::test]
    async fn approval_outcomes_map_to_errors(
        moderator: User,
        #[case] outcome: ApprovalOutcome,
        #[case] code: ErrorCode,
        #[case] expected_reason: Option<&str>,
    ) {
        let mut shops = MockShopRepository::new();
        shops
            .expect_approve_application()
            .return_once(move |_, _| Ok(outcome));

        let error = make_service(MockUserRepository::new(), shops)
            .approve_application(&moderator, &ApplicationId::random())
            .await
            .expect_err("rejected approval");

        assert_eq!(error.code(), code);
        assert_eq!(reason(&error), expected_reason.map(|r| json!(r)).as_ref());
    }

    #[rstest]
    #[tokio::test]
    async fn rejection_note_is_trimmed(moderator: User) {
        let mut shops = MockShopRepository::new();
        shops
            .expect_reject_application()
            .withf(|_, note, _| note.as_deref() == Some("incomplete"))
            .times(1)
            .return_once(|_, _, _| Ok(RejectionOutcome::NotPending));

        let error = make_service(MockUserRepository::new(), shops)
            .reject_application(
                &moderator,
                &ApplicationId::random(),
                Some("  incomplete  ".to_owned()),
            )
            .await
            .expect_err("not pending");

        assert_eq!(reason(&error), Some(&json!("application_not_pending")));
    }
}
