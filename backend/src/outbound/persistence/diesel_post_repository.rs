//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.
//!
//! Feed pages are loaded in one query joined to the author, then decorated
//! with grouped like/comment counts and the viewer's likes for that page.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{
    Comment, CommentId, CommentView, DeletionSummary, FeedQuery, Post, PostId, PostView, Reply,
    ReplyId, ReplyView, UserId,
};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, map_decode_error,
};
use super::diesel_cascades::{delete_comments, delete_posts};
use super::models::{AuthorRow, CommentRow, NewLikeRow, PostRow, ReplyRow, RowDecodeError};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, post_likes, posts, replies, users};

/// Diesel-backed implementation of the post repository port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostRepositoryError {
    map_basic_pool_error(error, PostRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PostRepositoryError {
    map_basic_diesel_error(
        error,
        PostRepositoryError::query,
        PostRepositoryError::connection,
    )
}

fn map_row_error(error: RowDecodeError) -> PostRepositoryError {
    map_decode_error(error, PostRepositoryError::query)
}

fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

async fn like_counts(
    conn: &mut AsyncPgConnection,
    post_ids: &[Uuid],
) -> QueryResult<HashMap<Uuid, u64>> {
    let rows: Vec<(Uuid, i64)> = post_likes::table
        .filter(post_likes::post_id.eq_any(post_ids))
        .group_by(post_likes::post_id)
        .select((post_likes::post_id, count_star()))
        .load(conn)
        .await?;
    Ok(rows.into_iter().map(|(id, n)| (id, count(n))).collect())
}

async fn comment_counts(
    conn: &mut AsyncPgConnection,
    post_ids: &[Uuid],
) -> QueryResult<HashMap<Uuid, u64>> {
    let rows: Vec<(Uuid, i64)> = comments::table
        .filter(comments::post_id.eq_any(post_ids))
        .group_by(comments::post_id)
        .select((comments::post_id, count_star()))
        .load(conn)
        .await?;
    Ok(rows.into_iter().map(|(id, n)| (id, count(n))).collect())
}

async fn liked_by(
    conn: &mut AsyncPgConnection,
    post_ids: &[Uuid],
    viewer: Option<UserId>,
) -> QueryResult<HashSet<Uuid>> {
    let Some(viewer) = viewer else {
        return Ok(HashSet::new());
    };
    let liked: Vec<Uuid> = post_likes::table
        .filter(post_likes::post_id.eq_any(post_ids))
        .filter(post_likes::user_id.eq(viewer.as_uuid()))
        .select(post_likes::post_id)
        .load(conn)
        .await?;
    Ok(liked.into_iter().collect())
}

async fn like_count(conn: &mut AsyncPgConnection, post_id: Uuid) -> QueryResult<u64> {
    let total: i64 = post_likes::table
        .filter(post_likes::post_id.eq(post_id))
        .count()
        .get_result(conn)
        .await?;
    Ok(count(total))
}

/// Decorate joined post rows with counters for `viewer`.
async fn decorate(
    conn: &mut AsyncPgConnection,
    rows: Vec<(PostRow, AuthorRow)>,
    viewer: Option<UserId>,
) -> Result<Vec<PostView>, PostRepositoryError> {
    let ids: Vec<Uuid> = rows.iter().map(|(post, _)| post.id).collect();
    let likes = like_counts(conn, &ids).await.map_err(map_diesel_error)?;
    let comments = comment_counts(conn, &ids).await.map_err(map_diesel_error)?;
    let liked = liked_by(conn, &ids, viewer).await.map_err(map_diesel_error)?;

    rows.into_iter()
        .map(|(post, author)| {
            let id = post.id;
            Ok(PostView {
                post: Post::from(post),
                author: author.into_summary().map_err(map_row_error)?,
                like_count: likes.get(&id).copied().unwrap_or_default(),
                comment_count: comments.get(&id).copied().unwrap_or_default(),
                liked_by_me: liked.contains(&id),
            })
        })
        .collect()
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn create_post(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(posts::table)
            .values(&PostRow::from(post))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_post(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = posts::table
            .find(id.as_uuid())
            .select(PostRow::as_select())
            .first::<PostRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Post::from))
    }

    async fn update_post(&self, post: &Post) -> Result<bool, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(posts::table.find(post.id.as_uuid()))
            .set(&PostRow::from(post))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete_post_cascade(
        &self,
        id: &PostId,
    ) -> Result<Option<DeletionSummary>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let post_id = *id.as_uuid();

        conn.transaction(|conn| {
            async move {
                let exists: Option<Uuid> = posts::table
                    .find(post_id)
                    .select(posts::id)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                match exists {
                    Some(_) => delete_posts(conn, &[post_id]).await.map(Some),
                    None => Ok(None),
                }
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn list_feed(
        &self,
        query: FeedQuery,
        viewer: Option<UserId>,
    ) -> Result<Vec<PostView>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut select = posts::table
            .inner_join(users::table)
            .select((PostRow::as_select(), AuthorRow::as_select()))
            .order((posts::created_at.desc(), posts::id.desc()))
            .limit(i64::from(query.limit))
            .offset(i64::from(query.offset))
            .into_boxed();
        if let Some(author_id) = query.author_id {
            select = select.filter(posts::author_id.eq(*author_id.as_uuid()));
        }
        let rows: Vec<(PostRow, AuthorRow)> =
            select.load(&mut conn).await.map_err(map_diesel_error)?;

        decorate(&mut conn, rows, viewer).await
    }

    async fn find_post_view(
        &self,
        id: &PostId,
        viewer: Option<UserId>,
    ) -> Result<Option<PostView>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(PostRow, AuthorRow)> = posts::table
            .inner_join(users::table)
            .filter(posts::id.eq(id.as_uuid()))
            .select((PostRow::as_select(), AuthorRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let views = decorate(&mut conn, row.into_iter().collect(), viewer).await?;
        Ok(views.into_iter().next())
    }

    async fn add_like(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<u64, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewLikeRow {
            post_id: *post_id.as_uuid(),
            user_id: *user_id.as_uuid(),
            created_at: at,
        };
        diesel::insert_into(post_likes::table)
            .values(&row)
            .on_conflict((post_likes::post_id, post_likes::user_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        like_count(&mut conn, row.post_id)
            .await
            .map_err(map_diesel_error)
    }

    async fn remove_like(
        &self,
        post_id: &PostId,
        user_id: &UserId,
    ) -> Result<u64, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(
            post_likes::table
                .filter(post_likes::post_id.eq(post_id.as_uuid()))
                .filter(post_likes::user_id.eq(user_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        like_count(&mut conn, *post_id.as_uuid())
            .await
            .map_err(map_diesel_error)
    }

    async fn create_comment(&self, comment: &Comment) -> Result<(), PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(comments::table)
            .values(&CommentRow::from(comment))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_comment(&self, id: &CommentId) -> Result<Option<Comment>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = comments::table
            .find(id.as_uuid())
            .select(CommentRow::as_select())
            .first::<CommentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Comment::from))
    }

    async fn list_comments(
        &self,
        post_id: &PostId,
    ) -> Result<Vec<CommentView>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(CommentRow, AuthorRow)> = comments::table
            .inner_join(users::table)
            .filter(comments::post_id.eq(post_id.as_uuid()))
            .order((comments::created_at.asc(), comments::id.asc()))
            .select((CommentRow::as_select(), AuthorRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|(comment, _)| comment.id).collect();
        let reply_counts: HashMap<Uuid, u64> = replies::table
            .filter(replies::comment_id.eq_any(&ids))
            .group_by(replies::comment_id)
            .select((replies::comment_id, count_star()))
            .load::<(Uuid, i64)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(|(id, n)| (id, count(n)))
            .collect();

        rows.into_iter()
            .map(|(comment, author)| {
                let reply_count = reply_counts.get(&comment.id).copied().unwrap_or_default();
                Ok(CommentView {
                    comment: Comment::from(comment),
                    author: author.into_summary().map_err(map_row_error)?,
                    reply_count,
                })
            })
            .collect()
    }

    async fn delete_comment_cascade(
        &self,
        id: &CommentId,
    ) -> Result<Option<DeletionSummary>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let comment_id = *id.as_uuid();

        conn.transaction(|conn| {
            async move {
                let exists: Option<Uuid> = comments::table
                    .find(comment_id)
                    .select(comments::id)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                match exists {
                    Some(_) => delete_comments(conn, &[comment_id]).await.map(Some),
                    None => Ok(None),
                }
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn create_reply(&self, reply: &Reply) -> Result<(), PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(replies::table)
            .values(&ReplyRow::from(reply))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_reply(&self, id: &ReplyId) -> Result<Option<Reply>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = replies::table
            .find(id.as_uuid())
            .select(ReplyRow::as_select())
            .first::<ReplyRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Reply::from))
    }

    async fn list_replies(
        &self,
        comment_id: &CommentId,
    ) -> Result<Vec<ReplyView>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(ReplyRow, AuthorRow)> = replies::table
            .inner_join(users::table)
            .filter(replies::comment_id.eq(comment_id.as_uuid()))
            .order((replies::created_at.asc(), replies::id.asc()))
            .select((ReplyRow::as_select(), AuthorRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(reply, author)| {
                Ok(ReplyView {
                    reply: Reply::from(reply),
                    author: author.into_summary().map_err(map_row_error)?,
                })
            })
            .collect()
    }

    async fn delete_reply(&self, id: &ReplyId) -> Result<bool, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(replies::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
