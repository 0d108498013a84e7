//! Feed handlers: posts, likes, comments and replies.
//!
//! ```text
//! GET /api/post?limit=20&offset=0&authorId=<uuid>
//! POST /api/post {"content":"Walkies","petId":"<uuid>"}
//! GET|PUT|DELETE /api/post/{id}
//! POST|DELETE /api/post/{id}/like
//! GET|POST /api/post/{id}/comment
//! DELETE /api/comment/{id}
//! GET|POST /api/comment/{id}/reply
//! DELETE /api/reply/{id}
//! ```
//!
//! Reads are public. A valid bearer token on a read fills `likedByMe`.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    CommentId, CommentView, DeletionSummary, Error, FeedQuery, LikeStatus, PetId, PostDraft,
    PostId, PostPatch, PostView, ReplyId, ReplyView, UserId, comment_content,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{CurrentUser, OptionalUser};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, double_option, require};

/// Feed paging parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub author_id: Option<UserId>,
}

impl TryFrom<FeedParams> for FeedQuery {
    type Error = Error;

    fn try_from(value: FeedParams) -> Result<Self, Self::Error> {
        Ok(Self::try_new(value.limit, value.offset, value.author_id)?)
    }
}

/// New post body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub content: Option<String>,
    pub image_url: Option<String>,
    /// Must be one of the caller's pets.
    pub pet_id: Option<PetId>,
}

impl TryFrom<CreatePostRequest> for PostDraft {
    type Error = Error;

    fn try_from(value: CreatePostRequest) -> Result<Self, Self::Error> {
        let content = require(value.content, FieldName::new("content"))?;
        Ok(Self::try_from_parts(
            &content,
            value.image_url.as_deref(),
            value.pet_id,
        )?)
    }
}

/// Post edit body. `"petId": null` removes the pet tag.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub content: Option<String>,
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub pet_id: Option<Option<PetId>>,
}

impl TryFrom<UpdatePostRequest> for PostPatch {
    type Error = Error;

    fn try_from(value: UpdatePostRequest) -> Result<Self, Self::Error> {
        Ok(Self::try_from_parts(
            value.content.as_deref(),
            value.image_url.as_deref(),
            value.pet_id,
        )?)
    }
}

/// Comment or reply body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ContentRequest {
    pub content: Option<String>,
}

impl ContentRequest {
    fn into_content(self) -> Result<String, Error> {
        let content = require(self.content, FieldName::new("content"))?;
        Ok(comment_content(&content)?)
    }
}

fn viewer(optional: &OptionalUser) -> Option<UserId> {
    optional.user().map(|user| user.id)
}

/// Page through the feed, newest first.
#[utoipa::path(
    get,
    path = "/api/post",
    params(
        ("limit" = Option<u32>, Query, description = "Page size, 1 to 100"),
        ("offset" = Option<u32>, Query, description = "Posts to skip"),
        ("authorId" = Option<UserId>, Query, description = "Only this author's posts")
    ),
    responses(
        (status = 200, description = "Feed page", body = [PostView]),
        (status = 400, description = "Invalid paging", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listFeed",
    security([])
)]
pub async fn list_feed(
    state: web::Data<HttpState>,
    optional: OptionalUser,
    params: web::Query<FeedParams>,
) -> ApiResult<web::Json<Vec<PostView>>> {
    let query = FeedQuery::try_from(params.into_inner())?;
    let posts = state.feed.list_feed(query, viewer(&optional)).await?;
    Ok(web::Json(posts))
}

/// Publish a post.
#[utoipa::path(
    post,
    path = "/api/post",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostView),
        (status = 400, description = "Invalid request or foreign pet", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
pub async fn create_post(
    state: web::Data<HttpState>,
    current: CurrentUser,
    payload: web::Json<CreatePostRequest>,
) -> ApiResult<HttpResponse> {
    let draft = PostDraft::try_from(payload.into_inner())?;
    let post = state.feed.create_post(current.user(), draft).await?;
    Ok(HttpResponse::Created().json(post))
}

/// Fetch one post.
#[utoipa::path(
    get,
    path = "/api/post/{id}",
    params(("id" = PostId, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post", body = PostView),
        (status = 404, description = "Unknown post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "getPost",
    security([])
)]
pub async fn get_post(
    state: web::Data<HttpState>,
    optional: OptionalUser,
    path: web::Path<PostId>,
) -> ApiResult<web::Json<PostView>> {
    let post = state
        .feed
        .get_post(&path.into_inner(), viewer(&optional))
        .await?;
    Ok(web::Json(post))
}

/// Edit one of the caller's posts.
#[utoipa::path(
    put,
    path = "/api/post/{id}",
    params(("id" = PostId, Path, description = "Post identifier")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated post", body = PostView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "Unknown post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "updatePost"
)]
pub async fn update_post(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<PostId>,
    payload: web::Json<UpdatePostRequest>,
) -> ApiResult<web::Json<PostView>> {
    let patch = PostPatch::try_from(payload.into_inner())?;
    let post = state
        .feed
        .update_post(current.user(), &path.into_inner(), patch)
        .await?;
    Ok(web::Json(post))
}

/// Delete a post with its likes, comments and replies.
#[utoipa::path(
    delete,
    path = "/api/post/{id}",
    params(("id" = PostId, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Rows removed", body = DeletionSummary),
        (status = 403, description = "Neither author nor admin", body = Error),
        (status = 404, description = "Unknown post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
pub async fn delete_post(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<PostId>,
) -> ApiResult<web::Json<DeletionSummary>> {
    let summary = state
        .feed
        .delete_post(current.user(), &path.into_inner())
        .await?;
    Ok(web::Json(summary))
}

/// Like a post. Liking twice keeps a single like.
#[utoipa::path(
    post,
    path = "/api/post/{id}/like",
    params(("id" = PostId, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Like state", body = LikeStatus),
        (status = 404, description = "Unknown post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "likePost"
)]
pub async fn like_post(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<PostId>,
) -> ApiResult<web::Json<LikeStatus>> {
    let status = state.feed.like(current.user(), &path.into_inner()).await?;
    Ok(web::Json(status))
}

/// Withdraw a like. Unliking a post the caller never liked is a no-op.
#[utoipa::path(
    delete,
    path = "/api/post/{id}/like",
    params(("id" = PostId, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Like state", body = LikeStatus),
        (status = 404, description = "Unknown post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "unlikePost"
)]
pub async fn unlike_post(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<PostId>,
) -> ApiResult<web::Json<LikeStatus>> {
    let status = state
        .feed
        .unlike(current.user(), &path.into_inner())
        .await?;
    Ok(web::Json(status))
}

/// Comments on a post, oldest first.
#[utoipa::path(
    get,
    path = "/api/post/{id}/comment",
    params(("id" = PostId, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Comments", body = [CommentView]),
        (status = 404, description = "Unknown post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listComments",
    security([])
)]
pub async fn list_comments(
    state: web::Data<HttpState>,
    path: web::Path<PostId>,
) -> ApiResult<web::Json<Vec<CommentView>>> {
    let comments = state.feed.list_comments(&path.into_inner()).await?;
    Ok(web::Json(comments))
}

/// Comment on a post.
#[utoipa::path(
    post,
    path = "/api/post/{id}/comment",
    params(("id" = PostId, Path, description = "Post identifier")),
    request_body = ContentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "addComment"
)]
pub async fn add_comment(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<PostId>,
    payload: web::Json<ContentRequest>,
) -> ApiResult<HttpResponse> {
    let content = payload.into_inner().into_content()?;
    let comment = state
        .feed
        .add_comment(current.user(), &path.into_inner(), content)
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

/// Delete a comment and its replies.
#[utoipa::path(
    delete,
    path = "/api/comment/{id}",
    params(("id" = CommentId, Path, description = "Comment identifier")),
    responses(
        (status = 200, description = "Rows removed", body = DeletionSummary),
        (status = 403, description = "Not the comment author, post author or an admin", body = Error),
        (status = 404, description = "Unknown comment", body = Error)
    ),
    tags = ["posts"],
    operation_id = "deleteComment"
)]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<CommentId>,
) -> ApiResult<web::Json<DeletionSummary>> {
    let summary = state
        .feed
        .delete_comment(current.user(), &path.into_inner())
        .await?;
    Ok(web::Json(summary))
}

/// Replies to a comment, oldest first.
#[utoipa::path(
    get,
    path = "/api/comment/{id}/reply",
    params(("id" = CommentId, Path, description = "Comment identifier")),
    responses(
        (status = 200, description = "Replies", body = [ReplyView]),
        (status = 404, description = "Unknown comment", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listReplies",
    security([])
)]
pub async fn list_replies(
    state: web::Data<HttpState>,
    path: web::Path<CommentId>,
) -> ApiResult<web::Json<Vec<ReplyView>>> {
    let replies = state.feed.list_replies(&path.into_inner()).await?;
    Ok(web::Json(replies))
}

/// Reply to a comment.
#[utoipa::path(
    post,
    path = "/api/comment/{id}/reply",
    params(("id" = CommentId, Path, description = "Comment identifier")),
    request_body = ContentRequest,
    responses(
        (status = 201, description = "Reply created", body = ReplyView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown comment", body = Error)
    ),
    tags = ["posts"],
    operation_id = "addReply"
)]
pub async fn add_reply(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<CommentId>,
    payload: web::Json<ContentRequest>,
) -> ApiResult<HttpResponse> {
    let content = payload.into_inner().into_content()?;
    let reply = state
        .feed
        .add_reply(current.user(), &path.into_inner(), content)
        .await?;
    Ok(HttpResponse::Created().json(reply))
}

/// Delete a reply.
#[utoipa::path(
    delete,
    path = "/api/reply/{id}",
    params(("id" = ReplyId, Path, description = "Reply identifier")),
    responses(
        (status = 204, description = "Reply removed"),
        (status = 403, description = "Neither reply author nor admin", body = Error),
        (status = 404, description = "Unknown reply", body = Error)
    ),
    tags = ["posts"],
    operation_id = "deleteReply"
)]
pub async fn delete_reply(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<ReplyId>,
) -> ApiResult<HttpResponse> {
    state
        .feed
        .delete_reply(current.user(), &path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
