//! Social feed service: posts, likes, comments and replies.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::access::{require_owner, require_owner_or_admin};
use crate::domain::ports::{FeedService, PetRepository, PostRepository};
use crate::domain::{
    Comment, CommentId, CommentView, DeletionSummary, Error, FeedQuery, FieldError, LikeStatus,
    PetId, Post, PostDraft, PostId, PostPatch, PostView, Reply, ReplyId, ReplyView, User, UserId,
    comment_content,
};

/// Feed service implementing [`FeedService`].
#[derive(Clone)]
pub struct FeedServiceImpl<Po, Pe> {
    posts: Arc<Po>,
    pets: Arc<Pe>,
    clock: Arc<dyn Clock>,
}

impl<Po, Pe> FeedServiceImpl<Po, Pe> {
    /// Create a new service.
    pub fn new(posts: Arc<Po>, pets: Arc<Pe>, clock: Arc<dyn Clock>) -> Self {
        Self { posts, pets, clock }
    }
}

fn post_not_found() -> Error {
    Error::not_found("post not found")
}

fn comment_not_found() -> Error {
    Error::not_found("comment not found")
}

impl<Po, Pe> FeedServiceImpl<Po, Pe>
where
    Po: PostRepository,
    Pe: PetRepository,
{
    async fn find_post(&self, id: &PostId) -> Result<Post, Error> {
        self.posts.find_post(id).await?.ok_or_else(post_not_found)
    }

    async fn find_comment(&self, id: &CommentId) -> Result<Comment, Error> {
        self.posts
            .find_comment(id)
            .await?
            .ok_or_else(comment_not_found)
    }

    /// Posts may only tag pets owned by their author.
    async fn ensure_pet_owned(&self, actor: &User, pet_id: Option<PetId>) -> Result<(), Error> {
        let Some(pet_id) = pet_id else {
            return Ok(());
        };
        let owned = self
            .pets
            .find_by_id(&pet_id)
            .await?
            .is_some_and(|pet| pet.owner_id == actor.id);
        if owned {
            Ok(())
        } else {
            Err(FieldError::new("petId", "invalid_pet", "pet must be one of your pets").into())
        }
    }

    async fn like_status(
        &self,
        id: &PostId,
        viewer: UserId,
        liked: bool,
    ) -> Result<LikeStatus, Error> {
        let like_count = if liked {
            self.posts.add_like(id, &viewer, self.clock.utc()).await?
        } else {
            self.posts.remove_like(id, &viewer).await?
        };
        Ok(LikeStatus { liked, like_count })
    }
}

#[async_trait]
impl<Po, Pe> FeedService for FeedServiceImpl<Po, Pe>
where
    Po: PostRepository,
    Pe: PetRepository,
{
    async fn list_feed(
        &self,
        query: FeedQuery,
        viewer: Option<UserId>,
    ) -> Result<Vec<PostView>, Error> {
        Ok(self.posts.list_feed(query, viewer).await?)
    }

    async fn get_post(&self, id: &PostId, viewer: Option<UserId>) -> Result<PostView, Error> {
        self.posts
            .find_post_view(id, viewer)
            .await?
            .ok_or_else(post_not_found)
    }

    async fn create_post(&self, actor: &User, draft: PostDraft) -> Result<PostView, Error> {
        self.ensure_pet_owned(actor, draft.pet_id).await?;
        let post = draft.into_post(actor.id, self.clock.utc());
        self.posts.create_post(&post).await?;
        Ok(PostView {
            post,
            author: actor.author_summary(),
            like_count: 0,
            comment_count: 0,
            liked_by_me: false,
        })
    }

    async fn update_post(
        &self,
        actor: &User,
        id: &PostId,
        patch: PostPatch,
    ) -> Result<PostView, Error> {
        let mut post = self.find_post(id).await?;
        require_owner(actor, &post.author_id, "post")?;
        if let Some(pet_id) = patch.pet_id {
            self.ensure_pet_owned(actor, pet_id).await?;
        }
        post.apply(patch, self.clock.utc());
        if !self.posts.update_post(&post).await? {
            return Err(post_not_found());
        }
        self.get_post(id, Some(actor.id)).await
    }

    async fn delete_post(&self, actor: &User, id: &PostId) -> Result<DeletionSummary, Error> {
        let post = self.find_post(id).await?;
        require_owner_or_admin(actor, &post.author_id, "post")?;
        let summary = self
            .posts
            .delete_post_cascade(id)
            .await?
            .ok_or_else(post_not_found)?;
        info!(user_id = %actor.id, post_id = %id, rows = summary.total(), "post deleted");
        Ok(summary)
    }

    async fn like(&self, actor: &User, id: &PostId) -> Result<LikeStatus, Error> {
        self.find_post(id).await?;
        self.like_status(id, actor.id, true).await
    }

    async fn unlike(&self, actor: &User, id: &PostId) -> Result<LikeStatus, Error> {
        self.find_post(id).await?;
        self.like_status(id, actor.id, false).await
    }

    async fn list_comments(&self, post_id: &PostId) -> Result<Vec<CommentView>, Error> {
        self.find_post(post_id).await?;
        Ok(self.posts.list_comments(post_id).await?)
    }

    async fn add_comment(
        &self,
        actor: &User,
        post_id: &PostId,
        content: String,
    ) -> Result<CommentView, Error> {
        let content = comment_content(&content)?;
        self.find_post(post_id).await?;
        let comment = Comment {
            id: CommentId::random(),
            post_id: *post_id,
            author_id: actor.id,
            content,
            created_at: self.clock.utc(),
        };
        self.posts.create_comment(&comment).await?;
        Ok(CommentView {
            comment,
            author: actor.author_summary(),
            reply_count: 0,
        })
    }

    async fn delete_comment(
        &self,
        actor: &User,
        id: &CommentId,
    ) -> Result<DeletionSummary, Error> {
        let comment = self.find_comment(id).await?;
        if comment.author_id != actor.id {
            // The author of the parent post moderates its thread.
            let post = self.find_post(&comment.post_id).await?;
            require_owner_or_admin(actor, &post.author_id, "comment")?;
        }
        let summary = self
            .posts
            .delete_comment_cascade(id)
            .await?
            .ok_or_else(comment_not_found)?;
        info!(user_id = %actor.id, comment_id = %id, rows = summary.total(), "comment deleted");
        Ok(summary)
    }

    async fn list_replies(&self, comment_id: &CommentId) -> Result<Vec<ReplyView>, Error> {
        self.find_comment(comment_id).await?;
        Ok(self.posts.list_replies(comment_id).await?)
    }

    async fn add_reply(
        &self,
        actor: &User,
        comment_id: &CommentId,
        content: String,
    ) -> Result<ReplyView, Error> {
        let content = comment_content(&content)?;
        self.find_comment(comment_id).await?;
        let reply = Reply {
            id: ReplyId::random(),
            comment_id: *comment_id,
            author_id: actor.id,
            content,
            created_at: self.clock.utc(),
        };
        self.posts.create_reply(&reply).await?;
        Ok(ReplyView {
            reply,
            author: actor.author_summary(),
        })
    }

    async fn delete_reply(&self, actor: &User, id: &ReplyId) -> Result<(), Error> {
        let reply = self
            .posts
            .find_reply(id)
            .await?
            .ok_or_else(|| Error::not_found("reply not found"))?;
        require_owner_or_admin(actor, &reply.author_id, "reply")?;
        if !self.posts.delete_reply(id).await? {
            return Err(Error::not_found("reply not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "feed_service_tests.rs"]
mod tests;
