//! Moderation service.
//!
//! Backs the administrator screens: member and pending-approval
//! listings, board-wide post and comment listings with removal, and
//! the post report queue.

use chrono::Utc;
use plaza_common::{AppError, AppResult};
use plaza_db::entities::{comment, post, report_post, user};
use plaza_db::repositories::{
    CommentRepository, PostRepository, ReportRepository, UserRepository, UserWithCounts,
};
use sea_orm::Set;
use tracing::info;

use super::page_offset;

/// Service for administrator moderation operations.
#[derive(Clone)]
pub struct ModerationService {
    user_repo: UserRepository,
    post_repo: PostRepository,
    comment_repo: CommentRepository,
    report_repo: ReportRepository,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        post_repo: PostRepository,
        comment_repo: CommentRepository,
        report_repo: ReportRepository,
    ) -> Self {
        Self {
            user_repo,
            post_repo,
            comment_repo,
            report_repo,
        }
    }

    /// Page of members with their post and comment counts, plus the
    /// total member count for the envelope.
    pub async fn list_users(&self, page: u64, limit: u64) -> AppResult<(Vec<UserWithCounts>, u64)> {
        let items = self
            .user_repo
            .list_with_counts(limit, page_offset(page, limit))
            .await?;
        let total = self.user_repo.count_all().await?;
        Ok((items, total))
    }

    /// A single member's full row.
    pub async fn get_user(&self, user_id: i64) -> AppResult<user::Model> {
        self.user_repo.get_by_id(user_id).await
    }

    /// Page of sign-ups awaiting a decision, rejected ones included.
    pub async fn list_pending_approvals(
        &self,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<user::Model>, u64)> {
        let items = self
            .user_repo
            .list_pending(limit, page_offset(page, limit))
            .await?;
        let total = self.user_repo.count_pending().await?;
        Ok((items, total))
    }

    /// Page of posts across all boards, optionally filtered by a
    /// title/content search term.
    pub async fn list_posts(
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

    /// Remove a post. Its comments go with it via the cascade.
    pub async fn delete_post(&self, post_id: i64) -> AppResult<()> {
        self.post_repo.delete(post_id).await?;
        info!(post_id, "Post removed by moderator");
        Ok(())
    }

    /// Flat page of comments and replies across all posts.
    pub async fn list_comments(
        &self,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<comment::Model>, u64)> {
        let items = self
            .comment_repo
            .list(limit, page_offset(page, limit))
            .await?;
        let total = self.comment_repo.count_all().await?;
        Ok((items, total))
    }

    /// Remove a comment or reply.
    pub async fn delete_comment(&self, comment_id: i64) -> AppResult<()> {
        self.comment_repo.delete(comment_id).await?;
        info!(comment_id, "Comment removed by moderator");
        Ok(())
    }

    /// File a report against a post.
    ///
    /// The offending content is snapshotted onto the report so the
    /// queue stays reviewable after the post itself is removed.
    pub async fn create_report(
        &self,
        reporter_id: i64,
        post_id: i64,
    ) -> AppResult<report_post::Model> {
        let post = self.post_repo.get_by_id(post_id).await?;

        if post.author_id == reporter_id {
            return Err(AppError::BadRequest(
                "Cannot report your own post".to_string(),
            ));
        }

        let model = report_post::ActiveModel {
            reporter_id: Set(reporter_id),
            reported_post_id: Set(post.id),
            reported_content: Set(post.content),
            reported_user_id: Set(post.author_id),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let report = self.report_repo.create(model).await?;
        info!(report_id = report.id, post_id, "Post reported");
        Ok(report)
    }

    /// Page of live reports for the moderation queue.
    pub async fn list_reports(
        &self,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<report_post::Model>, u64)> {
        let items = self
            .report_repo
            .list(limit, page_offset(page, limit))
            .await?;
        let total = self.report_repo.count().await?;
        Ok((items, total))
    }

    /// Dismiss a report. The row is kept, logically deleted.
    pub async fn delete_report(&self, report_id: i64) -> AppResult<report_post::Model> {
        let report = self.report_repo.soft_delete(report_id).await?;
        info!(report_id, "Report dismissed");
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service(db: MockDatabase) -> ModerationService {
        let conn = Arc::new(db.into_connection());
        ModerationService::new(
            UserRepository::new(Arc::clone(&conn)),
            PostRepository::new(Arc::clone(&conn)),
            CommentRepository::new(Arc::clone(&conn)),
            ReportRepository::new(conn),
        )
    }

    fn test_post(id: i64, author_id: i64) -> post::Model {
        post::Model {
            id,
            author_id,
            board: "free".to_string(),
            title: "title".to_string(),
            content: "content".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn delete_missing_post_fails() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()]),
        );

        let result = svc.delete_post(42).await;
        assert!(matches!(result, Err(AppError::PostNotFound(42))));
    }

    #[tokio::test]
    async fn report_own_post_fails() {
        let post = test_post(10, 1);

        let svc =
            service(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[post]]));

        let result = svc.create_report(1, 10).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn report_snapshots_post_content() {
        let post = test_post(10, 2);
        let report = report_post::Model {
            id: 1,
            reporter_id: 1,
            reported_post_id: 10,
            reported_content: "content".to_string(),
            reported_user_id: 2,
            created_at: Utc::now().into(),
            deleted_at: None,
        };

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .append_query_results([[report]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 1,
                    rows_affected: 1,
                }]),
        );

        let result = svc.create_report(1, 10).await.unwrap();

        assert_eq!(result.reported_content, "content");
        assert_eq!(result.reported_user_id, 2);
    }

    #[tokio::test]
    async fn report_missing_post_fails() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()]),
        );

        let result = svc.create_report(1, 42).await;
        assert!(matches!(result, Err(AppError::PostNotFound(42))));
    }
}
