//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use plaza_common::AppResult;
use plaza_core::services::user::RegisterInput;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Sign-up response. No token: the account waits for approval.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub membership_status: plaza_db::entities::user::MembershipStatus,
}

/// Register a new member, pending administrator approval.
async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<RegisterInput>,
) -> AppResult<ApiResponse<SignUpResponse>> {
    let user = state.user_service.register(req).await?;

    Ok(ApiResponse::ok(SignUpResponse {
        id: user.id,
        email: user.email,
        nickname: user.nickname,
        membership_status: user.membership_status,
    }))
}

/// Sign-in request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Sign-in response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub id: i64,
    pub nickname: String,
    pub token: String,
}

/// Sign in with email and password.
async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> AppResult<ApiResponse<SignInResponse>> {
    let user = state
        .user_service
        .authenticate(&req.email, &req.password)
        .await?;

    Ok(ApiResponse::ok(SignInResponse {
        id: user.id,
        nickname: user.nickname,
        token: user.token.unwrap_or_default(),
    }))
}

/// Sign-out response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOutResponse {
    pub ok: bool,
}

/// Invalidate the current bearer token.
async fn sign_out(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SignOutResponse>> {
    state.user_service.sign_out(user.id).await?;

    Ok(ApiResponse::ok(SignOutResponse { ok: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
        .route("/sign-out", post(sign_out))
}
