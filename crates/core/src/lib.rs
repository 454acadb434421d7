//! Core business logic for the plaza community platform.
//!
//! Services in this crate sit between the HTTP layer and the
//! repositories: they own the membership lifecycle rules, the
//! moderation workflow, and user-facing board operations.

pub mod services;

pub use services::{
    ApprovalDecision, CommentService, MembershipService, ModerationService, PostService,
    UserService,
};
