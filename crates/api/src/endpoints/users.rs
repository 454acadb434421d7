//! Self-service endpoints for the signed-in member.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, patch},
};
use plaza_common::AppResult;
use plaza_core::services::user::ChangePasswordInput;
use plaza_db::entities::user::{self, MembershipStatus};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, PageQuery, Paginated},
};

use super::comments::CommentResponse;
use super::posts::PostResponse;

/// Member profile response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub username: Option<String>,
    pub phone_number: Option<String>,
    pub membership_status: MembershipStatus,
    pub rejected: bool,
    pub suspension_reason: Option<String>,
    pub is_admin: bool,
    pub created_at: String,
    pub deleted_at: Option<String>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nickname: user.nickname,
            username: user.username,
            phone_number: user.phone_number,
            membership_status: user.membership_status,
            rejected: user.rejected,
            suspension_reason: user.suspension_reason,
            is_admin: user.is_admin,
            created_at: user.created_at.to_rfc3339(),
            deleted_at: user.deleted_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// The signed-in member's own profile.
async fn my_profile(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(user.into())
}

/// Nickname change request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNicknameRequest {
    pub nickname: String,
}

/// Change the member's display nickname.
async fn update_nickname(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateNicknameRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state
        .user_service
        .update_nickname(user.id, &req.nickname)
        .await?;

    Ok(ApiResponse::ok(updated.into()))
}

/// Password change response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordResponse {
    pub ok: bool,
}

/// Change the member's password.
async fn change_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordInput>,
) -> AppResult<ApiResponse<ChangePasswordResponse>> {
    state.user_service.change_password(user.id, req).await?;

    Ok(ApiResponse::ok(ChangePasswordResponse { ok: true }))
}

/// The member's own posts, paginated.
async fn my_posts(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Paginated<PostResponse>>> {
    let (items, total) = state
        .post_service
        .list_by_author(user.id, query.page(), query.limit())
        .await?;

    Ok(ApiResponse::ok(Paginated::new(
        items.into_iter().map(Into::into).collect(),
        total,
        query.page(),
        query.limit(),
    )))
}

/// The member's own comments, paginated.
async fn my_comments(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Paginated<CommentResponse>>> {
    let (items, total) = state
        .comment_service
        .list_by_author(user.id, query.page(), query.limit())
        .await?;

    Ok(ApiResponse::ok(Paginated::new(
        items.into_iter().map(Into::into).collect(),
        total,
        query.page(),
        query.limit(),
    )))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(my_profile))
        .route("/nickname", patch(update_nickname))
        .route("/password", patch(change_password))
        .route("/posts", get(my_posts))
        .route("/comments", get(my_comments))
}
