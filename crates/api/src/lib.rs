//! HTTP API layer for plaza.
//!
//! - **Endpoints**: member, board and administrator REST surfaces
//! - **Extractors**: bearer-token authentication and the admin guard
//! - **Middleware**: token resolution, request tracing
//!
//! Built on Axum 0.8 with the Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
