//! Post service.

use chrono::Utc;
use plaza_common::{AppError, AppResult};
use plaza_db::entities::post;
use plaza_db::repositories::PostRepository;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::page_offset;

/// Post service for board business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
}

/// Input for writing a new post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 32))]
    pub board: String,

    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,
}

/// Input for editing a post. Absent fields are left untouched.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostInput {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub content: Option<String>,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(post_repo: PostRepository) -> Self {
        Self { post_repo }
    }

    /// Write a new post on a board.
    pub async fn create(&self, author_id: i64, input: CreatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        let model = post::ActiveModel {
            author_id: Set(author_id),
            board: Set(input.board),
            title: Set(input.title),
            content: Set(input.content),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        self.post_repo.create(model).await
    }

    /// A single post.
    pub async fn get(&self, post_id: i64) -> AppResult<post::Model> {
        self.post_repo.get_by_id(post_id).await
    }

    /// Page of posts, newest first, optionally searched.
    pub async fn list(
        &self,
        page: u64,
        limit: u64,
        search: Option<&str>,
    ) -> AppResult<(Vec<post::Model>, u64)> {
        let items = self
            .post_repo
            .list(limit, page_offset(page, limit), search)
            .await?;
        let total = self.post_repo.count(search).await?;
        Ok((items, total))
    }

    /// Page of one author's own posts.
    pub async fn list_by_author(
        &self,
        author_id: i64,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<post::Model>, u64)> {
        let items = self
            .post_repo
            .list_by_author(author_id, limit, page_offset(page, limit))
            .await?;
        let total = self.post_repo.count_by_author(author_id).await?;
        Ok((items, total))
    }

    /// Edit one's own post.
    pub async fn update(
        &self,
        author_id: i64,
        post_id: i64,
        input: UpdatePostInput,
    ) -> AppResult<post::Model> {
        input.validate()?;

        let post = self.post_repo.get_by_id(post_id).await?;
        if post.author_id != author_id {
            return Err(AppError::Forbidden(
                "You can only edit your own posts".to_string(),
            ));
        }

        let mut model: post::ActiveModel = post.into();
        if let Some(title) = input.title {
            model.title = Set(title);
        }
        if let Some(content) = input.content {
            model.content = Set(content);
        }
        model.updated_at = Set(Some(Utc::now().into()));

        self.post_repo.update(model).await
    }

    /// Delete one's own post.
    pub async fn delete(&self, author_id: i64, post_id: i64) -> AppResult<()> {
        let post = self.post_repo.get_by_id(post_id).await?;
        if post.author_id != author_id {
            return Err(AppError::Forbidden(
                "You can only delete your own posts".to_string(),
            ));
        }

        self.post_repo.delete(post_id).await
    }
}
