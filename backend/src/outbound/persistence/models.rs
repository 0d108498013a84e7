//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions back into domain types re-run
//! the domain parsers, so a row that no longer satisfies them surfaces as a
//! query error rather than a panic.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    ApplicationId, ApplicationStatus, AuthorSummary, Comment, CommentId, DisplayName, Email,
    FieldError, Gender, MedicalRecord, Pet, PetId, Post, PostId, PromotionId, PromotionalPost,
    RecordId, Reply, ReplyId, Shop, ShopApplication, ShopDetails, ShopId, Task, TaskId, User,
    UserId, Username, VaccinationRecord,
};

use super::schema::{
    comments, medical_records, pets, post_likes, posts, promotions, replies, shop_applications,
    shops, tasks, users, vaccination_records,
};

/// Failure to rebuild a domain value from a stored row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored {entity} is invalid: {message}")]
pub(crate) struct RowDecodeError {
    entity: &'static str,
    message: String,
}

impl RowDecodeError {
    fn new(entity: &'static str, message: impl Into<String>) -> Self {
        Self {
            entity,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_shop_owner: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, RowDecodeError> {
        let decode = |err: FieldError| RowDecodeError::new("user", err.to_string());
        Ok(User {
            id: UserId::from_uuid(self.id),
            email: Email::parse(&self.email).map_err(decode)?,
            username: Username::parse(&self.username).map_err(decode)?,
            display_name: DisplayName::parse(&self.display_name).map_err(decode)?,
            bio: self.bio,
            avatar_url: self.avatar_url,
            is_admin: self.is_admin,
            is_shop_owner: self.is_shop_owner,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub username: &'a str,
    pub display_name: &'a str,
    pub bio: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
    pub password_hash: &'a str,
    pub is_admin: bool,
    pub is_shop_owner: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for updating profile fields and flags.
///
/// `treat_none_as_null` lets a cleared bio or avatar reach the database.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserUpdate<'a> {
    pub display_name: &'a str,
    pub bio: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
    pub is_admin: bool,
    pub is_shop_owner: bool,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a User> for UserUpdate<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            display_name: user.display_name.as_ref(),
            bio: user.bio.as_deref(),
            avatar_url: user.avatar_url.as_deref(),
            is_admin: user.is_admin,
            is_shop_owner: user.is_shop_owner,
            updated_at: user.updated_at,
        }
    }
}

/// Columns needed to render an author summary.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AuthorRow {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl AuthorRow {
    pub(crate) fn into_summary(self) -> Result<AuthorSummary, RowDecodeError> {
        let decode = |err: FieldError| RowDecodeError::new("author", err.to_string());
        Ok(AuthorSummary {
            id: UserId::from_uuid(self.id),
            username: Username::parse(&self.username).map_err(decode)?,
            display_name: DisplayName::parse(&self.display_name).map_err(decode)?,
            avatar_url: self.avatar_url,
        })
    }
}

// ---------------------------------------------------------------------------
// Pets
// ---------------------------------------------------------------------------

/// Row, insert and changeset struct for the pets table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = pets)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PetRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: String,
    pub weight_kg: Option<f64>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PetRow> for Pet {
    fn from(row: PetRow) -> Self {
        Self {
            id: PetId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.owner_id),
            name: row.name,
            species: row.species,
            breed: row.breed,
            birth_date: row.birth_date,
            gender: Gender::from_storage(&row.gender),
            weight_kg: row.weight_kg,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<&Pet> for PetRow {
    fn from(pet: &Pet) -> Self {
        Self {
            id: *pet.id.as_uuid(),
            owner_id: *pet.owner_id.as_uuid(),
            name: pet.name.clone(),
            species: pet.species.clone(),
            breed: pet.breed.clone(),
            birth_date: pet.birth_date,
            gender: pet.gender.as_str().to_owned(),
            weight_kg: pet.weight_kg,
            image_url: pet.image_url.clone(),
            created_at: pet.created_at,
            updated_at: pet.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Health records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = medical_records)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MedicalRecordRow {
    pub id: Uuid,
    pub pet_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub vet_name: Option<String>,
    pub visit_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<MedicalRecordRow> for MedicalRecord {
    fn from(row: MedicalRecordRow) -> Self {
        Self {
            id: RecordId::from_uuid(row.id),
            pet_id: PetId::from_uuid(row.pet_id),
            title: row.title,
            description: row.description,
            vet_name: row.vet_name,
            visit_date: row.visit_date,
            created_at: row.created_at,
        }
    }
}

impl From<&MedicalRecord> for MedicalRecordRow {
    fn from(record: &MedicalRecord) -> Self {
        Self {
            id: *record.id.as_uuid(),
            pet_id: *record.pet_id.as_uuid(),
            title: record.title.clone(),
            description: record.description.clone(),
            vet_name: record.vet_name.clone(),
            visit_date: record.visit_date,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = vaccination_records)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VaccinationRecordRow {
    pub id: Uuid,
    pub pet_id: Uuid,
    pub vaccine_name: String,
    pub administered_on: NaiveDate,
    pub next_due_on: Option<NaiveDate>,
    pub vet_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<VaccinationRecordRow> for VaccinationRecord {
    fn from(row: VaccinationRecordRow) -> Self {
        Self {
            id: RecordId::from_uuid(row.id),
            pet_id: PetId::from_uuid(row.pet_id),
            vaccine_name: row.vaccine_name,
            administered_on: row.administered_on,
            next_due_on: row.next_due_on,
            vet_name: row.vet_name,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

impl From<&VaccinationRecord> for VaccinationRecordRow {
    fn from(record: &VaccinationRecord) -> Self {
        Self {
            id: *record.id.as_uuid(),
            pet_id: *record.pet_id.as_uuid(),
            vaccine_name: record.vaccine_name.clone(),
            administered_on: record.administered_on,
            next_due_on: record.next_due_on,
            vet_name: record.vet_name.clone(),
            notes: record.notes.clone(),
            created_at: record.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Feed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = posts)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub pet_id: Option<Uuid>,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: PostId::from_uuid(row.id),
            author_id: UserId::from_uuid(row.author_id),
            pet_id: row.pet_id.map(PetId::from_uuid),
            content: row.content,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<&Post> for PostRow {
    fn from(post: &Post) -> Self {
        Self {
            id: *post.id.as_uuid(),
            author_id: *post.author_id.as_uuid(),
            pet_id: post.pet_id.map(|id| *id.as_uuid()),
            content: post.content.clone(),
            image_url: post.image_url.clone(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = post_likes)]
pub(crate) struct NewLikeRow {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: CommentId::from_uuid(row.id),
            post_id: PostId::from_uuid(row.post_id),
            author_id: UserId::from_uuid(row.author_id),
            content: row.content,
            created_at: row.created_at,
        }
    }
}

impl From<&Comment> for CommentRow {
    fn from(comment: &Comment) -> Self {
        Self {
            id: *comment.id.as_uuid(),
            post_id: *comment.post_id.as_uuid(),
            author_id: *comment.author_id.as_uuid(),
            content: comment.content.clone(),
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = replies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReplyRow {
    pub id: Uuid,
    pub comment_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReplyRow> for Reply {
    fn from(row: ReplyRow) -> Self {
        Self {
            id: ReplyId::from_uuid(row.id),
            comment_id: CommentId::from_uuid(row.comment_id),
            author_id: UserId::from_uuid(row.author_id),
            content: row.content,
            created_at: row.created_at,
        }
    }
}

impl From<&Reply> for ReplyRow {
    fn from(reply: &Reply) -> Self {
        Self {
            id: *reply.id.as_uuid(),
            comment_id: *reply.comment_id.as_uuid(),
            author_id: *reply.author_id.as_uuid(),
            content: reply.content.clone(),
            created_at: reply.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Shops
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = shop_applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ShopApplicationRow {
    pub id: Uuid,
    pub applicant_id: Uuid,
    pub shop_name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub status: String,
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl ShopApplicationRow {
    pub(crate) fn into_application(self) -> Result<ShopApplication, RowDecodeError> {
        let status = ApplicationStatus::from_storage(&self.status).ok_or_else(|| {
            RowDecodeError::new("shop application", format!("unknown status {}", self.status))
        })?;
        Ok(ShopApplication {
            id: ApplicationId::from_uuid(self.id),
            applicant_id: UserId::from_uuid(self.applicant_id),
            shop_name: self.shop_name,
            details: ShopDetails {
                description: self.description,
                address: self.address,
                phone: self.phone,
            },
            status,
            review_note: self.review_note,
            created_at: self.created_at,
            reviewed_at: self.reviewed_at,
        })
    }
}

impl From<&ShopApplication> for ShopApplicationRow {
    fn from(application: &ShopApplication) -> Self {
        Self {
            id: *application.id.as_uuid(),
            applicant_id: *application.applicant_id.as_uuid(),
            shop_name: application.shop_name.clone(),
            description: application.details.description.clone(),
            address: application.details.address.clone(),
            phone: application.details.phone.clone(),
            status: application.status.as_str().to_owned(),
            review_note: application.review_note.clone(),
            created_at: application.created_at,
            reviewed_at: application.reviewed_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = shops)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ShopRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ShopRow> for Shop {
    fn from(row: ShopRow) -> Self {
        Self {
            id: ShopId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.owner_id),
            name: row.name,
            details: ShopDetails {
                description: row.description,
                address: row.address,
                phone: row.phone,
            },
            logo_url: row.logo_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<&Shop> for ShopRow {
    fn from(shop: &Shop) -> Self {
        Self {
            id: *shop.id.as_uuid(),
            owner_id: *shop.owner_id.as_uuid(),
            name: shop.name.clone(),
            description: shop.details.description.clone(),
            address: shop.details.address.clone(),
            phone: shop.details.phone.clone(),
            logo_url: shop.logo_url.clone(),
            created_at: shop.created_at,
            updated_at: shop.updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = promotions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PromotionRow {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PromotionRow> for PromotionalPost {
    fn from(row: PromotionRow) -> Self {
        Self {
            id: PromotionId::from_uuid(row.id),
            shop_id: ShopId::from_uuid(row.shop_id),
            title: row.title,
            content: row.content,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

impl From<&PromotionalPost> for PromotionRow {
    fn from(promotion: &PromotionalPost) -> Self {
        Self {
            id: *promotion.id.as_uuid(),
            shop_id: *promotion.shop_id.as_uuid(),
            title: promotion.title.clone(),
            content: promotion.content.clone(),
            image_url: promotion.image_url.clone(),
            created_at: promotion.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TaskRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub pet_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: TaskId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.owner_id),
            pet_id: row.pet_id.map(PetId::from_uuid),
            title: row.title,
            description: row.description,
            due_at: row.due_at,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: *task.id.as_uuid(),
            owner_id: *task.owner_id.as_uuid(),
            pet_id: task.pet_id.map(|id| *id.as_uuid()),
            title: task.title.clone(),
            description: task.description.clone(),
            due_at: task.due_at,
            completed: task.completed,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}
