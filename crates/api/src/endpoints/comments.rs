//! Comment endpoints.
//!
//! Creation and the per-post listing hang off `/posts/{postId}`; only
//! deletion lives at `/comments/{commentId}`.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::delete,
};
use plaza_common::AppResult;
use plaza_core::services::comment::CreateCommentInput;
use plaza_db::entities::comment;
use serde::Serialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, ok},
};

/// Comment response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
    pub created_at: String,
}

impl From<comment::Model> for CommentResponse {
    fn from(comment: comment::Model) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            parent_id: comment.parent_id,
            content: comment.content,
            created_at: comment.created_at.to_rfc3339(),
        }
    }
}

/// Write a comment on a post, or a reply when `parentId` is given.
pub(super) async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Json(req): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state.comment_service.create(user.id, post_id, req).await?;
    Ok(ApiResponse::ok(comment.into()))
}

/// Delete one's own comment.
async fn delete_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.comment_service.delete(user.id, comment_id).await?;
    Ok(ok())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/comments/{commentId}", delete(delete_comment))
}
