//! PostgreSQL-backed `ShopRepository` implementation using Diesel ORM.
//!
//! Application review runs inside a transaction that locks the application
//! row, so two admins cannot approve the same request twice.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{
    ApprovalOutcome, RejectionOutcome, ShopRepository, ShopRepositoryError,
};
use crate::domain::{
    ApplicationId, ApplicationStatus, DeletionSummary, PromotionId, PromotionalPost, Shop,
    ShopApplication, ShopId, UserId,
};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, map_decode_error, unique_violation,
};
use super::diesel_cascades::delete_shops;
use super::models::{PromotionRow, RowDecodeError, ShopApplicationRow, ShopRow};
use super::pool::{DbPool, PoolError};
use super::schema::{promotions, shop_applications, shops, users};

/// Diesel-backed implementation of the shop repository port.
#[derive(Clone)]
pub struct DieselShopRepository {
    pool: DbPool,
}

impl DieselShopRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ShopRepositoryError {
    map_basic_pool_error(error, ShopRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ShopRepositoryError {
    if let Some(constraint) = unique_violation(&error) {
        return ShopRepositoryError::conflict(format!("unique constraint {constraint} violated"));
    }
    map_basic_diesel_error(
        error,
        ShopRepositoryError::query,
        ShopRepositoryError::connection,
    )
}

fn map_row_error(error: RowDecodeError) -> ShopRepositoryError {
    map_decode_error(error, ShopRepositoryError::query)
}

fn decode_applications(
    rows: Vec<ShopApplicationRow>,
) -> Result<Vec<ShopApplication>, ShopRepositoryError> {
    rows.into_iter()
        .map(ShopApplicationRow::into_application)
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_row_error)
}

/// Review step outcome as seen inside the transaction.
enum Reviewed<T> {
    Done(T),
    NotFound,
    NotPending,
    AlreadyShopOwner,
}

#[async_trait]
impl ShopRepository for DieselShopRepository {
    async fn create_application(
        &self,
        application: &ShopApplication,
    ) -> Result<(), ShopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(shop_applications::table)
            .values(&ShopApplicationRow::from(application))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_pending_application(
        &self,
        applicant_id: &UserId,
    ) -> Result<Option<ShopApplication>, ShopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = shop_applications::table
            .filter(shop_applications::applicant_id.eq(applicant_id.as_uuid()))
            .filter(shop_applications::status.eq(ApplicationStatus::Pending.as_str()))
            .select(ShopApplicationRow::as_select())
            .first::<ShopApplicationRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(ShopApplicationRow::into_application)
            .transpose()
            .map_err(map_row_error)
    }

    async fn list_applications_by_applicant(
        &self,
        applicant_id: &UserId,
    ) -> Result<Vec<ShopApplication>, ShopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ShopApplicationRow> = shop_applications::table
            .filter(shop_applications::applicant_id.eq(applicant_id.as_uuid()))
            .order((
                shop_applications::created_at.desc(),
                shop_applications::id.desc(),
            ))
            .select(ShopApplicationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        decode_applications(rows)
    }

    async fn list_applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<ShopApplication>, ShopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut select = shop_applications::table
            .order((
                shop_applications::created_at.asc(),
                shop_applications::id.asc(),
            ))
            .select(ShopApplicationRow::as_select())
            .into_boxed();
        if let Some(status) = status {
            select = select.filter(shop_applications::status.eq(status.as_str()));
        }
        let rows: Vec<ShopApplicationRow> =
            select.load(&mut conn).await.map_err(map_diesel_error)?;
        decode_applications(rows)
    }

    async fn approve_application(
        &self,
        id: &ApplicationId,
        at: DateTime<Utc>,
    ) -> Result<ApprovalOutcome, ShopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let application_id = *id.as_uuid();

        let reviewed = conn
            .transaction(|conn| {
                async move {
                    let Some(row) = shop_applications::table
                        .find(application_id)
                        .select(ShopApplicationRow::as_select())
                        .for_update()
                        .first::<ShopApplicationRow>(conn)
                        .await
                        .optional()?
                    else {
                        return Ok(Reviewed::NotFound);
                    };
                    if row.status != ApplicationStatus::Pending.as_str() {
                        return Ok(Reviewed::NotPending);
                    }
                    let owns_shop: i64 = shops::table
                        .filter(shops::owner_id.eq(row.applicant_id))
                        .count()
                        .get_result(conn)
                        .await?;
                    if owns_shop > 0 {
                        return Ok(Reviewed::AlreadyShopOwner);
                    }

                    diesel::update(shop_applications::table.find(application_id))
                        .set((
                            shop_applications::status.eq(ApplicationStatus::Approved.as_str()),
                            shop_applications::reviewed_at.eq(Some(at)),
                        ))
                        .execute(conn)
                        .await?;
                    diesel::update(users::table.find(row.applicant_id))
                        .set(users::is_shop_owner.eq(true))
                        .execute(conn)
                        .await?;
                    let shop = ShopRow {
                        id: Uuid::new_v4(),
                        owner_id: row.applicant_id,
                        name: row.shop_name,
                        description: row.description,
                        address: row.address,
                        phone: row.phone,
                        logo_url: None,
                        created_at: at,
                        updated_at: at,
                    };
                    diesel::insert_into(shops::table)
                        .values(&shop)
                        .execute(conn)
                        .await?;
                    Ok(Reviewed::Done(shop))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(match reviewed {
            Reviewed::Done(shop) => ApprovalOutcome::Approved(Shop::from(shop)),
            Reviewed::NotFound => ApprovalOutcome::NotFound,
            Reviewed::NotPending => ApprovalOutcome::NotPending,
            Reviewed::AlreadyShopOwner => ApprovalOutcome::AlreadyShopOwner,
        })
    }

    async fn reject_application(
        &self,
        id: &ApplicationId,
        note: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<RejectionOutcome, ShopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let application_id = *id.as_uuid();

        let reviewed = conn
            .transaction(|conn| {
                async move {
                    let Some(mut row) = shop_applications::table
                        .find(application_id)
                        .select(ShopApplicationRow::as_select())
                        .for_update()
                        .first::<ShopApplicationRow>(conn)
                        .await
                        .optional()?
                    else {
                        return Ok(Reviewed::NotFound);
                    };
                    if row.status != ApplicationStatus::Pending.as_str() {
                        return Ok(Reviewed::NotPending);
                    }
                    diesel::update(shop_applications::table.find(application_id))
                        .set((
                            shop_applications::status.eq(ApplicationStatus::Rejected.as_str()),
                            shop_applications::review_note.eq(note.as_deref()),
                            shop_applications::reviewed_at.eq(Some(at)),
                        ))
                        .execute(conn)
                        .await?;
                    row.status = ApplicationStatus::Rejected.as_str().to_owned();
                    row.review_note = note;
                    row.reviewed_at = Some(at);
                    Ok(Reviewed::Done(row))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        match reviewed {
            Reviewed::Done(row) => row
                .into_application()
                .map(RejectionOutcome::Rejected)
                .map_err(map_row_error),
            Reviewed::NotFound => Ok(RejectionOutcome::NotFound),
            Reviewed::NotPending | Reviewed::AlreadyShopOwner => Ok(RejectionOutcome::NotPending),
        }
    }

    async fn find_shop(&self, id: &ShopId) -> Result<Option<Shop>, ShopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = shops::table
            .find(id.as_uuid())
            .select(ShopRow::as_select())
            .first::<ShopRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Shop::from))
    }

    async fn find_shop_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Option<Shop>, ShopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = shops::table
            .filter(shops::owner_id.eq(owner_id.as_uuid()))
            .select(ShopRow::as_select())
            .first::<ShopRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Shop::from))
    }

    async fn list_shops(&self) -> Result<Vec<Shop>, ShopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ShopRow> = shops::table
            .order((shops::name.asc(), shops::id.asc()))
            .select(ShopRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Shop::from).collect())
    }

    async fn update_shop(&self, shop: &Shop) -> Result<bool, ShopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(shops::table.find(shop.id.as_uuid()))
            .set(&ShopRow::from(shop))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete_shop_cascade(
        &self,
        id: &ShopId,
    ) -> Result<Option<DeletionSummary>, ShopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let shop_id = *id.as_uuid();

        conn.transaction(|conn| {
            async move {
                let exists: Option<Uuid> = shops::table
                    .find(shop_id)
                    .select(shops::id)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                match exists {
                    Some(_) => delete_shops(conn, &[shop_id]).await.map(Some),
                    None => Ok(None),
                }
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn create_promotion(
        &self,
        promotion: &PromotionalPost,
    ) -> Result<(), ShopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(promotions::table)
            .values(&PromotionRow::from(promotion))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_promotion(
        &self,
        id: &PromotionId,
    ) -> Result<Option<PromotionalPost>, ShopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = promotions::table
            .find(id.as_uuid())
            .select(PromotionRow::as_select())
            .first::<PromotionRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(PromotionalPost::from))
    }

    async fn list_promotions(
        &self,
        shop_id: Option<ShopId>,
    ) -> Result<Vec<PromotionalPost>, ShopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut select = promotions::table
            .order((promotions::created_at.desc(), promotions::id.desc()))
            .select(PromotionRow::as_select())
            .into_boxed();
        if let Some(shop_id) = shop_id {
            select = select.filter(promotions::shop_id.eq(*shop_id.as_uuid()));
        }
        let rows: Vec<PromotionRow> = select.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(PromotionalPost::from).collect())
    }

    async fn delete_promotion(&self, id: &PromotionId) -> Result<bool, ShopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(promotions::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
