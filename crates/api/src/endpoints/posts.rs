//! Board post endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use plaza_common::AppResult;
use plaza_core::services::post::{CreatePostInput, UpdatePostInput};
use plaza_db::entities::post;
use serde::Serialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, PageQuery, Paginated, ok},
};

use super::comments::{CommentResponse, create_comment};

/// Post response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i64,
    pub author_id: i64,
    pub board: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<post::Model> for PostResponse {
    fn from(post: post::Model) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            board: post.board,
            title: post.title,
            content: post.content,
            created_at: post.created_at.to_rfc3339(),
            updated_at: post.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Page of posts, optionally searched by title or content.
async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Paginated<PostResponse>>> {
    let (items, total) = state
        .post_service
        .list(query.page(), query.limit(), query.search())
        .await?;

    Ok(ApiResponse::ok(Paginated::new(
        items.into_iter().map(Into::into).collect(),
        total,
        query.page(),
        query.limit(),
    )))
}

/// A single post.
async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state.post_service.get(post_id).await?;
    Ok(ApiResponse::ok(post.into()))
}

/// Write a new post.
async fn create_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreatePostInput>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state.post_service.create(user.id, req).await?;
    Ok(ApiResponse::ok(post.into()))
}

/// Edit one's own post.
async fn update_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Json(req): Json<UpdatePostInput>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state.post_service.update(user.id, post_id, req).await?;
    Ok(ApiResponse::ok(post.into()))
}

/// Delete one's own post.
async fn delete_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.post_service.delete(user.id, post_id).await?;
    Ok(ok())
}

/// Report response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: i64,
    pub reporter_id: i64,
    pub reported_post_id: i64,
    pub reported_content: String,
    pub reported_user_id: i64,
    pub created_at: String,
}

impl From<plaza_db::entities::report_post::Model> for ReportResponse {
    fn from(report: plaza_db::entities::report_post::Model) -> Self {
        Self {
            id: report.id,
            reporter_id: report.reporter_id,
            reported_post_id: report.reported_post_id,
            reported_content: report.reported_content,
            reported_user_id: report.reported_user_id,
            created_at: report.created_at.to_rfc3339(),
        }
    }
}

/// Report a post to the moderators.
async fn report_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .moderation_service
        .create_report(user.id, post_id)
        .await?;

    Ok(ApiResponse::ok(report.into()))
}

/// All comments on a post in thread order.
async fn post_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let comments = state.comment_service.list_for_post(post_id).await?;

    Ok(ApiResponse::ok(
        comments.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route(
            "/{postId}",
            get(get_post).patch(update_post).delete(delete_post),
        )
        .route("/{postId}/report", post(report_post))
        .route("/{postId}/comments", get(post_comments).post(create_comment))
}
