//! Comment service.

use chrono::Utc;
use plaza_common::{AppError, AppResult};
use plaza_db::entities::comment;
use plaza_db::repositories::{CommentRepository, PostRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::page_offset;

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
}

/// Input for writing a comment, or a reply when `parent_id` is set.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 2048))]
    pub content: String,

    pub parent_id: Option<i64>,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(comment_repo: CommentRepository, post_repo: PostRepository) -> Self {
        Self {
            comment_repo,
            post_repo,
        }
    }

    /// Write a comment on a post. A reply must name a parent comment
    /// on the same post.
    pub async fn create(
        &self,
        author_id: i64,
        post_id: i64,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        let post = self.post_repo.get_by_id(post_id).await?;

        if let Some(parent_id) = input.parent_id {
            let parent = self.comment_repo.get_by_id(parent_id).await?;
            if parent.post_id != post.id {
                return Err(AppError::BadRequest(
                    "Parent comment belongs to a different post".to_string(),
                ));
            }
        }

        let model = comment::ActiveModel {
            post_id: Set(post.id),
            author_id: Set(author_id),
            parent_id: Set(input.parent_id),
            content: Set(input.content),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        self.comment_repo.create(model).await
    }

    /// All comments on a post in thread order.
    pub async fn list_for_post(&self, post_id: i64) -> AppResult<Vec<comment::Model>> {
        // Confirm the post exists so a bad ID is a 404, not an empty list.
        self.post_repo.get_by_id(post_id).await?;
        self.comment_repo.list_by_post(post_id).await
    }

    /// Page of one author's own comments.
    pub async fn list_by_author(
        &self,
        author_id: i64,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<comment::Model>, u64)> {
        let items = self
            .comment_repo
            .list_by_author(author_id, limit, page_offset(page, limit))
            .await?;
        let total = self.comment_repo.count_by_author(author_id).await?;
        Ok((items, total))
    }

    /// Delete one's own comment.
    pub async fn delete(&self, author_id: i64, comment_id: i64) -> AppResult<()> {
        let comment = self.comment_repo.get_by_id(comment_id).await?;
        if comment.author_id != author_id {
            return Err(AppError::Forbidden(
                "You can only delete your own comments".to_string(),
            ));
        }

        self.comment_repo.delete(comment_id).await
    }
}
