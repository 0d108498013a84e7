//! Port for feed persistence: posts, likes, comments and replies.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Comment, CommentId, CommentView, DeletionSummary, FeedQuery, Post, PostId, PostView, Reply,
    ReplyId, ReplyView, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
    }
}

/// Port for the social feed.
///
/// `viewer` parameters only drive the `likedByMe` flag; anonymous readers
/// pass `None`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post.
    async fn create_post(&self, post: &Post) -> Result<(), PostRepositoryError>;

    /// Find a post by id.
    async fn find_post(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError>;

    /// Overwrite a post's editable fields. Returns `false` when it is gone.
    async fn update_post(&self, post: &Post) -> Result<bool, PostRepositoryError>;

    /// Delete a post with its likes, comment replies and comments in one
    /// transaction. Returns `None` when the post does not exist.
    async fn delete_post_cascade(
        &self,
        id: &PostId,
    ) -> Result<Option<DeletionSummary>, PostRepositoryError>;

    /// Page through posts, newest first.
    async fn list_feed(
        &self,
        query: FeedQuery,
        viewer: Option<UserId>,
    ) -> Result<Vec<PostView>, PostRepositoryError>;

    /// Load a single post view.
    async fn find_post_view(
        &self,
        id: &PostId,
        viewer: Option<UserId>,
    ) -> Result<Option<PostView>, PostRepositoryError>;

    /// Record a like; a repeated like is a no-op. Returns the like count.
    async fn add_like(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<u64, PostRepositoryError>;

    /// Remove a like if present. Returns the like count.
    async fn remove_like(
        &self,
        post_id: &PostId,
        user_id: &UserId,
    ) -> Result<u64, PostRepositoryError>;

    /// Insert a comment.
    async fn create_comment(&self, comment: &Comment) -> Result<(), PostRepositoryError>;

    /// Find a comment by id.
    async fn find_comment(&self, id: &CommentId) -> Result<Option<Comment>, PostRepositoryError>;

    /// List a post's comments, oldest first.
    async fn list_comments(
        &self,
        post_id: &PostId,
    ) -> Result<Vec<CommentView>, PostRepositoryError>;

    /// Delete a comment and its replies in one transaction. Returns `None`
    /// when the comment does not exist.
    async fn delete_comment_cascade(
        &self,
        id: &CommentId,
    ) -> Result<Option<DeletionSummary>, PostRepositoryError>;

    /// Insert a reply.
    async fn create_reply(&self, reply: &Reply) -> Result<(), PostRepositoryError>;

    /// Find a reply by id.
    async fn find_reply(&self, id: &ReplyId) -> Result<Option<Reply>, PostRepositoryError>;

    /// List a comment's replies, oldest first.
    async fn list_replies(
        &self,
        comment_id: &CommentId,
    ) -> Result<Vec<ReplyView>, PostRepositoryError>;

    /// Delete a reply. Returns `false` when it is gone.
    async fn delete_reply(&self, id: &ReplyId) -> Result<bool, PostRepositoryError>;
}
