//! Posts, likes, comments and replies that make up the social feed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::validation::{FieldError, optional_url, required_text};
use super::{AuthorSummary, CommentId, PetId, PostId, ReplyId, UserId};

const POST_CONTENT_MAX: usize = 2000;
const COMMENT_CONTENT_MAX: usize = 1000;
const DEFAULT_PAGE_LIMIT: u32 = 20;
const MAX_PAGE_LIMIT: u32 = 100;

/// A feed post, optionally tagging one of the author's pets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub pet_id: Option<PetId>,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a new post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub content: String,
    pub image_url: Option<String>,
    pub pet_id: Option<PetId>,
}

impl PostDraft {
    /// Validate raw fields. Pet ownership is checked by the feed service.
    pub fn try_from_parts(
        content: &str,
        image_url: Option<&str>,
        pet_id: Option<PetId>,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            content: required_text("content", content, POST_CONTENT_MAX)?,
            image_url: optional_url("imageUrl", image_url)?,
            pet_id,
        })
    }

    /// Materialise the post for `author_id`.
    #[must_use]
    pub fn into_post(self, author_id: UserId, at: DateTime<Utc>) -> Post {
        Post {
            id: PostId::random(),
            author_id,
            pet_id: self.pet_id,
            content: self.content,
            image_url: self.image_url,
            created_at: at,
            updated_at: at,
        }
    }
}

/// Validated post update. Outer `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub content: Option<String>,
    pub image_url: Option<Option<String>>,
    pub pet_id: Option<Option<PetId>>,
}

impl PostPatch {
    /// Validate raw update fields. An empty `image_url` clears the image.
    pub fn try_from_parts(
        content: Option<&str>,
        image_url: Option<&str>,
        pet_id: Option<Option<PetId>>,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            content: content
                .map(|value| required_text("content", value, POST_CONTENT_MAX))
                .transpose()?,
            image_url: image_url
                .map(|value| optional_url("imageUrl", Some(value)))
                .transpose()?,
            pet_id,
        })
    }
}

impl Post {
    /// Apply a validated patch.
    pub fn apply(&mut self, patch: PostPatch, at: DateTime<Utc>) {
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(pet_id) = patch.pet_id {
            self.pet_id = pet_id;
        }
        self.updated_at = at;
    }
}

/// Post enriched with author and engagement counters for a given viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub author: AuthorSummary,
    pub like_count: u64,
    pub comment_count: u64,
    pub liked_by_me: bool,
}

/// Feed paging and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuery {
    pub limit: u32,
    pub offset: u32,
    pub author_id: Option<UserId>,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
            author_id: None,
        }
    }
}

impl FeedQuery {
    /// Validate raw paging parameters.
    pub fn try_new(
        limit: Option<u32>,
        offset: Option<u32>,
        author_id: Option<UserId>,
    ) -> Result<Self, FieldError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(FieldError::new(
                "limit",
                "out_of_range",
                format!("limit must be between 1 and {MAX_PAGE_LIMIT}"),
            ));
        }
        Ok(Self {
            limit,
            offset: offset.unwrap_or(0),
            author_id,
        })
    }
}

/// Like state returned after a like or unlike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub liked: bool,
    pub like_count: u64,
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Comment with its author and reply count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: AuthorSummary,
    pub reply_count: u64,
}

/// A reply to a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: ReplyId,
    pub comment_id: CommentId,
    pub author_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Reply with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplyView {
    #[serde(flatten)]
    pub reply: Reply,
    pub author: AuthorSummary,
}

/// Validate comment or reply text.
pub fn comment_content(content: &str) -> Result<String, FieldError> {
    required_text("content", content, COMMENT_CONTENT_MAX)
}
