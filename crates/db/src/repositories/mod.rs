//! Database repositories.
//!
//! Each repository wraps an `Arc<DatabaseConnection>` and is the only
//! place SQL is issued from; services depend on these, not on the
//! connection itself.

pub mod comment;
pub mod post;
pub mod report;
pub mod user;

pub use comment::CommentRepository;
pub use post::PostRepository;
pub use report::ReportRepository;
pub use user::{UserRepository, UserWithCounts};
