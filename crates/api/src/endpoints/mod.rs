//! API endpoints.

mod admin;
mod auth;
mod comments;
mod posts;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/me", users::router())
        .nest("/posts", posts::router())
        .merge(comments::router())
        .nest("/admin", admin::router())
}
