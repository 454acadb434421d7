//! Database entities.

pub mod comment;
pub mod post;
pub mod report_post;
pub mod user;

pub use comment::Entity as Comment;
pub use post::Entity as Post;
pub use report_post::Entity as ReportPost;
pub use user::Entity as User;
