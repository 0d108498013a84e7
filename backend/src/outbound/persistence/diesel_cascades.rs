//! Multi-table deletes shared by the repository adapters.
//!
//! Every function expects to run inside a caller-owned transaction and
//! deletes children before parents so foreign keys hold at each step.

use diesel::prelude::*;
use diesel::result::QueryResult;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::DeletionSummary;

use super::schema::{
    comments, medical_records, pets, post_likes, posts, promotions, replies, shop_applications,
    shops, tasks, users, vaccination_records,
};

fn rows(affected: usize) -> u64 {
    u64::try_from(affected).unwrap_or(u64::MAX)
}

/// Delete comments and their replies.
pub(super) async fn delete_comments(
    conn: &mut AsyncPgConnection,
    comment_ids: &[Uuid],
) -> QueryResult<DeletionSummary> {
    let replies = diesel::delete(replies::table.filter(replies::comment_id.eq_any(comment_ids)))
        .execute(conn)
        .await?;
    let comments = diesel::delete(comments::table.filter(comments::id.eq_any(comment_ids)))
        .execute(conn)
        .await?;
    Ok(DeletionSummary {
        replies: rows(replies),
        comments: rows(comments),
        ..DeletionSummary::default()
    })
}

/// Delete posts with their likes, comment replies and comments.
pub(super) async fn delete_posts(
    conn: &mut AsyncPgConnection,
    post_ids: &[Uuid],
) -> QueryResult<DeletionSummary> {
    let likes = diesel::delete(post_likes::table.filter(post_likes::post_id.eq_any(post_ids)))
        .execute(conn)
        .await?;
    let comment_ids: Vec<Uuid> = comments::table
        .filter(comments::post_id.eq_any(post_ids))
        .select(comments::id)
        .load(conn)
        .await?;
    let mut summary = delete_comments(conn, &comment_ids).await?;
    let posts = diesel::delete(posts::table.filter(posts::id.eq_any(post_ids)))
        .execute(conn)
        .await?;
    summary += DeletionSummary {
        likes: rows(likes),
        posts: rows(posts),
        ..DeletionSummary::default()
    };
    Ok(summary)
}

/// Delete pets with their health records and tasks. Posts tagging them are
/// kept and untagged.
pub(super) async fn delete_pets(
    conn: &mut AsyncPgConnection,
    pet_ids: &[Uuid],
) -> QueryResult<DeletionSummary> {
    let medical =
        diesel::delete(medical_records::table.filter(medical_records::pet_id.eq_any(pet_ids)))
            .execute(conn)
            .await?;
    let vaccinations = diesel::delete(
        vaccination_records::table.filter(vaccination_records::pet_id.eq_any(pet_ids)),
    )
    .execute(conn)
    .await?;
    let tasks = diesel::delete(tasks::table.filter(tasks::pet_id.eq_any(pet_ids)))
        .execute(conn)
        .await?;
    diesel::update(posts::table.filter(posts::pet_id.eq_any(pet_ids)))
        .set(posts::pet_id.eq(None::<Uuid>))
        .execute(conn)
        .await?;
    let pets = diesel::delete(pets::table.filter(pets::id.eq_any(pet_ids)))
        .execute(conn)
        .await?;
    Ok(DeletionSummary {
        medical_records: rows(medical),
        vaccination_records: rows(vaccinations),
        tasks: rows(tasks),
        pets: rows(pets),
        ..DeletionSummary::default()
    })
}

/// Delete shops with their promotions and clear the owners' shop flag.
pub(super) async fn delete_shops(
    conn: &mut AsyncPgConnection,
    shop_ids: &[Uuid],
) -> QueryResult<DeletionSummary> {
    let owner_ids: Vec<Uuid> = shops::table
        .filter(shops::id.eq_any(shop_ids))
        .select(shops::owner_id)
        .load(conn)
        .await?;
    let promotions = diesel::delete(promotions::table.filter(promotions::shop_id.eq_any(shop_ids)))
        .execute(conn)
        .await?;
    let shops = diesel::delete(shops::table.filter(shops::id.eq_any(shop_ids)))
        .execute(conn)
        .await?;
    diesel::update(users::table.filter(users::id.eq_any(&owner_ids)))
        .set(users::is_shop_owner.eq(false))
        .execute(conn)
        .await?;
    Ok(DeletionSummary {
        promotions: rows(promotions),
        shops: rows(shops),
        ..DeletionSummary::default()
    })
}

/// Delete a user and everything they own, in dependency order.
pub(super) async fn delete_user(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
) -> QueryResult<DeletionSummary> {
    let likes = diesel::delete(post_likes::table.filter(post_likes::user_id.eq(user_id)))
        .execute(conn)
        .await?;
    let replies = diesel::delete(replies::table.filter(replies::author_id.eq(user_id)))
        .execute(conn)
        .await?;
    let mut summary = DeletionSummary {
        likes: rows(likes),
        replies: rows(replies),
        ..DeletionSummary::default()
    };

    let comment_ids: Vec<Uuid> = comments::table
        .filter(comments::author_id.eq(user_id))
        .select(comments::id)
        .load(conn)
        .await?;
    summary += delete_comments(conn, &comment_ids).await?;

    let post_ids: Vec<Uuid> = posts::table
        .filter(posts::author_id.eq(user_id))
        .select(posts::id)
        .load(conn)
        .await?;
    summary += delete_posts(conn, &post_ids).await?;

    let tasks = diesel::delete(tasks::table.filter(tasks::owner_id.eq(user_id)))
        .execute(conn)
        .await?;
    summary.tasks += rows(tasks);

    let pet_ids: Vec<Uuid> = pets::table
        .filter(pets::owner_id.eq(user_id))
        .select(pets::id)
        .load(conn)
        .await?;
    summary += delete_pets(conn, &pet_ids).await?;

    let shop_ids: Vec<Uuid> = shops::table
        .filter(shops::owner_id.eq(user_id))
        .select(shops::id)
        .load(conn)
        .await?;
    summary += delete_shops(conn, &shop_ids).await?;

    let applications = diesel::delete(
        shop_applications::table.filter(shop_applications::applicant_id.eq(user_id)),
    )
    .execute(conn)
    .await?;
    let users = diesel::delete(users::table.find(user_id))
        .execute(conn)
        .await?;
    summary.applications += rows(applications);
    summary.users += rows(users);
    Ok(summary)
}
