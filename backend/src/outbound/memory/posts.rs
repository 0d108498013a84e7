//! `PostRepository` over the in-memory state.

use std::cmp::Reverse;
use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{
    AuthorSummary, Comment, CommentId, CommentView, DeletionSummary, FeedQuery, Post, PostId,
    PostView, Reply, ReplyId, ReplyView, UserId,
};

use super::{MemoryStore, Parent, State, count};

fn post_parents(post: &Post) -> Vec<Parent> {
    std::iter::once(Parent::User(post.author_id))
        .chain(post.pet_id.map(Parent::Pet))
        .collect()
}

fn missing_author(id: &UserId) -> PostRepositoryError {
    PostRepositoryError::query(format!("author {id} does not exist"))
}

impl State {
    fn author(&self, id: &UserId) -> Result<AuthorSummary, PostRepositoryError> {
        self.users
            .get(id)
            .map(|account| account.user.author_summary())
            .ok_or_else(|| missing_author(id))
    }

    fn like_count(&self, post_id: &PostId) -> u64 {
        count(
            self.likes
                .keys()
                .filter(|(liked, _)| liked == post_id)
                .count(),
        )
    }

    fn post_view(
        &self,
        post: &Post,
        viewer: Option<UserId>,
    ) -> Result<PostView, PostRepositoryError> {
        Ok(PostView {
            post: post.clone(),
            author: self.author(&post.author_id)?,
            like_count: self.like_count(&post.id),
            comment_count: count(
                self.comments
                    .values()
                    .filter(|comment| comment.post_id == post.id)
                    .count(),
            ),
            liked_by_me: viewer.is_some_and(|viewer| self.likes.contains_key(&(post.id, viewer))),
        })
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create_post(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut state = self.state();
        state
            .require_parents(&post_parents(post))
            .map_err(PostRepositoryError::query)?;
        state.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn find_post(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError> {
        Ok(self.state().posts.get(id).cloned())
    }

    async fn update_post(&self, post: &Post) -> Result<bool, PostRepositoryError> {
        let mut state = self.state();
        if !state.posts.contains_key(&post.id) {
            return Ok(false);
        }
        state
            .require_parents(&post_parents(post))
            .map_err(PostRepositoryError::query)?;
        state.posts.insert(post.id, post.clone());
        Ok(true)
    }

    async fn delete_post_cascade(
        &self,
        id: &PostId,
    ) -> Result<Option<DeletionSummary>, PostRepositoryError> {
        let mut state = self.state();
        if !state.posts.contains_key(id) {
            return Ok(None);
        }
        Ok(Some(state.delete_posts(&HashSet::from([*id]))))
    }

    async fn list_feed(
        &self,
        query: FeedQuery,
        viewer: Option<UserId>,
    ) -> Result<Vec<PostView>, PostRepositoryError> {
        let state = self.state();
        let mut posts: Vec<&Post> = state
            .posts
            .values()
            .filter(|post| query.author_id.is_none_or(|author| post.author_id == author))
            .collect();
        posts.sort_by_key(|post| Reverse((post.created_at, post.id)));
        posts
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .map(|post| state.post_view(post, viewer))
            .collect()
    }

    async fn find_post_view(
        &self,
        id: &PostId,
        viewer: Option<UserId>,
    ) -> Result<Option<PostView>, PostRepositoryError> {
        let state = self.state();
        state
            .posts
            .get(id)
            .map(|post| state.post_view(post, viewer))
            .transpose()
    }

    async fn add_like(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<u64, PostRepositoryError> {
        let mut state = self.state();
        state
            .require_parents(&[Parent::Post(*post_id), Parent::User(*user_id)])
            .map_err(PostRepositoryError::query)?;
        state.likes.entry((*post_id, *user_id)).or_insert(at);
        Ok(state.like_count(post_id))
    }

    async fn remove_like(
        &self,
        post_id: &PostId,
        user_id: &UserId,
    ) -> Result<u64, PostRepositoryError> {
        let mut state = self.state();
        state.likes.remove(&(*post_id, *user_id));
        Ok(state.like_count(post_id))
    }

    async fn create_comment(&self, comment: &Comment) -> Result<(), PostRepositoryError> {
        let mut state = self.state();
        state
            .require_parents(&[Parent::Post(comment.post_id), Parent::User(comment.author_id)])
            .map_err(PostRepositoryError::query)?;
        state.comments.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn find_comment(&self, id: &CommentId) -> Result<Option<Comment>, PostRepositoryError> {
        Ok(self.state().comments.get(id).cloned())
    }

    async fn list_comments(
        &self,
        post_id: &PostId,
    ) -> Result<Vec<CommentView>, PostRepositoryError> {
        let state = self.state();
        let mut comments: Vec<&Comment> = state
            .comments
            .values()
            .filter(|comment| comment.post_id == *post_id)
            .collect();
        comments.sort_by_key(|comment| (comment.created_at, comment.id));
        comments
            .into_iter()
            .map(|comment| {
                Ok(CommentView {
                    comment: comment.clone(),
                    author: state.author(&comment.author_id)?,
                    reply_count: count(
                        state
                            .replies
                            .values()
                            .filter(|reply| reply.comment_id == comment.id)
                            .count(),
                    ),
                })
            })
            .collect()
    }

    async fn delete_comment_cascade(
        &self,
        id: &CommentId,
    ) -> Result<Option<DeletionSummary>, PostRepositoryError> {
        let mut state = self.state();
        if !state.comments.contains_key(id) {
            return Ok(None);
        }
        Ok(Some(state.delete_comments(&HashSet::from([*id]))))
    }

    async fn create_reply(&self, reply: &Reply) -> Result<(), PostRepositoryError> {
        let mut state = self.state();
        state
            .require_parents(&[Parent::Comment(reply.comment_id), Parent::User(reply.author_id)])
            .map_err(PostRepositoryError::query)?;
        state.replies.insert(reply.id, reply.clone());
        Ok(())
    }

    async fn find_reply(&self, id: &ReplyId) -> Result<Option<Reply>, PostRepositoryError> {
        Ok(self.state().replies.get(id).cloned())
    }

    async fn list_replies(
        &self,
        comment_id: &CommentId,
    ) -> Result<Vec<ReplyView>, PostRepositoryError> {
        let state = self.state();
        let mut replies: Vec<&Reply> = state
            .replies
            .values()
            .filter(|reply| reply.comment_id == *comment_id)
            .collect();
        replies.sort_by_key(|reply| (reply.created_at, reply.id));
        replies
            .into_iter()
            .map(|reply| {
                Ok(ReplyView {
                    reply: reply.clone(),
                    author: state.author(&reply.author_id)?,
                })
            })
            .collect()
    }

    async fn delete_reply(&self, id: &ReplyId) -> Result<bool, PostRepositoryError> {
        Ok(self.state().replies.remove(id).is_some())
    }
}
