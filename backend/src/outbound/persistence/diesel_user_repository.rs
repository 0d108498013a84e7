//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{
    ApplicationStatus, DeletionSummary, Email, PlatformStats, StoredCredentials, User, UserId,
};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, map_decode_error, unique_violation,
};
use super::diesel_cascades::delete_user;
use super::models::{NewUserRow, RowDecodeError, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, pets, posts, shop_applications, shops, users};

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

fn map_row_error(error: RowDecodeError) -> UserRepositoryError {
    map_decode_error(error, UserRepositoryError::query)
}

/// Translate unique violations into the field the client must change.
fn map_insert_error(error: diesel::result::Error) -> UserRepositoryError {
    match unique_violation(&error) {
        Some(constraint) if constraint.contains("username") => {
            UserRepositoryError::duplicate("username")
        }
        Some(_) => UserRepositoryError::duplicate("email"),
        None => map_diesel_error(error),
    }
}

fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id.as_uuid(),
            email: user.email.as_ref(),
            username: user.username.as_ref(),
            display_name: user.display_name.as_ref(),
            bio: user.bio.as_deref(),
            avatar_url: user.avatar_url.as_deref(),
            password_hash,
            is_admin: user.is_admin,
            is_shop_owner: user.is_shop_owner,
            created_at: user.created_at,
            updated_at: user.updated_at,
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_insert_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(UserRow::into_user).transpose().map_err(map_row_error)
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| {
            let password_hash = row.password_hash.clone();
            row.into_user().map(|user| StoredCredentials {
                user,
                password_hash,
            })
        })
        .transpose()
        .map_err(map_row_error)
    }

    async fn update(&self, user: &User) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserUpdate::from(user);
        let updated = diesel::update(users::table.find(user.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order((users::created_at.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(UserRow::into_user)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_row_error)
    }

    async fn delete_cascade(
        &self,
        id: &UserId,
    ) -> Result<Option<DeletionSummary>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *id.as_uuid();

        conn.transaction(|conn| {
            async move {
                let exists: Option<uuid::Uuid> = users::table
                    .find(user_id)
                    .select(users::id)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                match exists {
                    Some(_) => delete_user(conn, user_id).await.map(Some),
                    None => Ok(None),
                }
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn stats(&self) -> Result<PlatformStats, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let users: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let pets: i64 = pets::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let posts: i64 = posts::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let comments: i64 = comments::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let shops: i64 = shops::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let pending: i64 = shop_applications::table
            .filter(shop_applications::status.eq(ApplicationStatus::Pending.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(PlatformStats {
            users: count(users),
            pets: count(pets),
            posts: count(posts),
            comments: count(comments),
            shops: count(shops),
            pending_applications: count(pending),
        })
    }
}
