//! Service layer.

pub mod comment;
pub mod membership;
pub mod moderation;
pub mod post;
pub mod user;

pub use comment::{CommentService, CreateCommentInput};
pub use membership::{ApprovalDecision, MembershipService};
pub use moderation::ModerationService;
pub use post::{CreatePostInput, PostService, UpdatePostInput};
pub use user::{ChangePasswordInput, RegisterInput, UserService};

/// Row offset for a 1-indexed page.
///
/// Saturates instead of overflowing; an absurd page number yields an
/// offset past the table, which the query answers with an empty page.
#[must_use]
pub(crate) const fn page_offset(page: u64, limit: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(limit)
}

#[cfg(test)]
mod tests {
    use super::page_offset;

    #[test]
    fn page_offset_first_page_is_zero() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(2, 10), 10);
    }

    #[test]
    fn page_offset_zero_page_is_treated_as_first() {
        assert_eq!(page_offset(0, 10), 0);
    }

    #[test]
    fn page_offset_saturates_on_huge_page_numbers() {
        assert_eq!(page_offset(u64::MAX, 10), u64::MAX);
        assert_eq!(page_offset(u64::MAX, u64::MAX), u64::MAX);
    }
}
