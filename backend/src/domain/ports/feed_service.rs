//! Driving port for the social feed.

use async_trait::async_trait;

use crate::domain::{
    CommentId, CommentView, DeletionSummary, Error, FeedQuery, LikeStatus, PostDraft, PostId,
    PostPatch, PostView, ReplyId, ReplyView, User, UserId,
};

/// Posts, likes, comments and replies.
///
/// `viewer` is the signed-in reader, if any; it only affects `likedByMe`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedService: Send + Sync {
    /// Page through the feed.
    async fn list_feed(
        &self,
        query: FeedQuery,
        viewer: Option<UserId>,
    ) -> Result<Vec<PostView>, Error>;

    /// Fetch one post.
    async fn get_post(&self, id: &PostId, viewer: Option<UserId>) -> Result<PostView, Error>;

    /// Publish a post.
    async fn create_post(&self, actor: &User, draft: PostDraft) -> Result<PostView, Error>;

    /// Edit one of the caller's posts.
    async fn update_post(
        &self,
        actor: &User,
        id: &PostId,
        patch: PostPatch,
    ) -> Result<PostView, Error>;

    /// Delete a post written by the caller, or any post for an admin.
    async fn delete_post(&self, actor: &User, id: &PostId) -> Result<DeletionSummary, Error>;

    /// Like a post. Repeating the call changes nothing.
    async fn like(&self, actor: &User, id: &PostId) -> Result<LikeStatus, Error>;

    /// Remove the caller's like. Repeating the call changes nothing.
    async fn unlike(&self, actor: &User, id: &PostId) -> Result<LikeStatus, Error>;

    /// Comments on a post, oldest first.
    async fn list_comments(&self, post_id: &PostId) -> Result<Vec<CommentView>, Error>;

    /// Comment on a post.
    async fn add_comment(
        &self,
        actor: &User,
        post_id: &PostId,
        content: String,
    ) -> Result<CommentView, Error>;

    /// Delete a comment as its author, the post author or an admin.
    async fn delete_comment(&self, actor: &User, id: &CommentId)
    -> Result<DeletionSummary, Error>;

    /// Replies to a comment, oldest first.
    async fn list_replies(&self, comment_id: &CommentId) -> Result<Vec<ReplyView>, Error>;

    /// Reply to a comment.
    async fn add_reply(
        &self,
        actor: &User,
        comment_id: &CommentId,
        content: String,
    ) -> Result<ReplyView, Error>;

    /// Delete a reply as its author or an admin.
    async fn delete_reply(&self, actor: &User, id: &ReplyId) -> Result<(), Error>;
}
