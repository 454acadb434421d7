//! API middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use plaza_core::{CommentService, MembershipService, ModerationService, PostService, UserService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub membership_service: MembershipService,
    pub moderation_service: ModerationService,
    pub post_service: PostService,
    pub comment_service: CommentService,
}

/// Authentication middleware.
///
/// Resolves the bearer token into a user model on the request
/// extensions. Routes that need a user pick it up through `AuthUser`
/// or `AdminUser`; everything else is untouched.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.user_service.authenticate_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
