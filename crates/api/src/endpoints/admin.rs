//! Administrator endpoints.
//!
//! Everything here except sign-in requires the `AdminUser` guard.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};
use plaza_common::AppResult;
use plaza_core::ApprovalDecision;
use plaza_db::repositories::UserWithCounts;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AdminUser,
    middleware::AppState,
    response::{ApiResponse, PageQuery, Paginated, ok},
};

use super::auth::SignInRequest;
use super::comments::CommentResponse;
use super::posts::{PostResponse, ReportResponse};
use super::users::UserResponse;

/// Admin sign-in response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSignInResponse {
    pub id: i64,
    pub nickname: String,
    pub token: String,
}

/// Sign in with administrator credentials.
async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> AppResult<ApiResponse<AdminSignInResponse>> {
    let user = state
        .user_service
        .authenticate_admin(&req.email, &req.password)
        .await?;

    Ok(ApiResponse::ok(AdminSignInResponse {
        id: user.id,
        nickname: user.nickname,
        token: user.token.unwrap_or_default(),
    }))
}

/// Request naming the member a lifecycle action applies to.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActionRequest {
    pub user_id: i64,
}

/// Suspension request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspendUserRequest {
    pub user_id: i64,
    pub reason: String,
}

/// Approval decision request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub user_id: i64,
    pub approve: bool,
}

/// Withdraw a member on their behalf.
async fn withdraw_user(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<UserActionRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.membership_service.withdraw(req.user_id).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Reverse a withdrawal, restoring the prior membership state.
async fn cancel_withdrawal(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<UserActionRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .membership_service
        .cancel_withdrawal(req.user_id)
        .await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Suspend an active member.
async fn suspend_user(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<SuspendUserRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .membership_service
        .suspend(req.user_id, &req.reason)
        .await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Lift a suspension.
async fn cancel_suspension(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<UserActionRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .membership_service
        .cancel_suspension(req.user_id)
        .await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Paginated member list with per-member post and comment counts.
async fn list_users(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Paginated<UserWithCounts>>> {
    let (items, total) = state
        .moderation_service
        .list_users(query.page(), query.limit())
        .await?;

    Ok(ApiResponse::ok(Paginated::new(
        items,
        total,
        query.page(),
        query.limit(),
    )))
}

/// A single member's detail.
async fn get_user(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.moderation_service.get_user(user_id).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Paginated list of sign-ups awaiting a decision.
async fn list_pending_approvals(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Paginated<UserResponse>>> {
    let (items, total) = state
        .moderation_service
        .list_pending_approvals(query.page(), query.limit())
        .await?;

    Ok(ApiResponse::ok(Paginated::new(
        items.into_iter().map(Into::into).collect(),
        total,
        query.page(),
        query.limit(),
    )))
}

/// Decide a pending sign-up.
async fn decide_approval(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<ApprovalRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let decision = if req.approve {
        ApprovalDecision::Approve
    } else {
        ApprovalDecision::Reject
    };

    let user = state
        .membership_service
        .approve_or_reject(req.user_id, decision)
        .await?;

    Ok(ApiResponse::ok(user.into()))
}

/// Paginated post listing with optional search.
async fn list_posts(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Paginated<PostResponse>>> {
    let (items, total) = state
        .moderation_service
        .list_posts(query.page(), query.limit(), query.search())
        .await?;

    Ok(ApiResponse::ok(Paginated::new(
        items.into_iter().map(Into::into).collect(),
        total,
        query.page(),
        query.limit(),
    )))
}

/// Remove a post.
async fn delete_post(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.moderation_service.delete_post(post_id).await?;
    Ok(ok())
}

/// Flat paginated listing of comments and replies.
async fn list_comments(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Paginated<CommentResponse>>> {
    let (items, total) = state
        .moderation_service
        .list_comments(query.page(), query.limit())
        .await?;

    Ok(ApiResponse::ok(Paginated::new(
        items.into_iter().map(Into::into).collect(),
        total,
        query.page(),
        query.limit(),
    )))
}

/// Remove a comment or reply.
async fn delete_comment(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.moderation_service.delete_comment(comment_id).await?;
    Ok(ok())
}

/// Paginated moderation report queue.
async fn list_reports(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Paginated<ReportResponse>>> {
    let (items, total) = state
        .moderation_service
        .list_reports(query.page(), query.limit())
        .await?;

    Ok(ApiResponse::ok(Paginated::new(
        items.into_iter().map(Into::into).collect(),
        total,
        query.page(),
        query.limit(),
    )))
}

/// Dismiss a report, keeping the row for the audit trail.
async fn delete_report(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(report_id): Path<i64>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state.moderation_service.delete_report(report_id).await?;
    Ok(ApiResponse::ok(report.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-in", post(sign_in))
        .route("/withdrawal", delete(withdraw_user))
        .route("/withdrawal/cancel", post(cancel_withdrawal))
        .route("/suspension", post(suspend_user))
        .route("/suspension/cancel", post(cancel_suspension))
        .route("/users", get(list_users))
        .route("/users/{userId}", get(get_user))
        .route("/approval", get(list_pending_approvals).post(decide_approval))
        .route("/posts", get(list_posts))
        .route("/posts/{postId}", delete(delete_post))
        .route("/comments", get(list_comments))
        .route("/comments/{commentId}", delete(delete_comment))
        .route("/reports", get(list_reports))
        .route("/reports/{reportId}", delete(delete_report))
}
