//! Post report repository.

use std::sync::Arc;

use crate::entities::{ReportPost, report_post};
use plaza_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// Report repository for database operations.
#[derive(Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a report by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<report_post::Model>> {
        ReportPost::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a report by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i64) -> AppResult<report_post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report not found: {id}")))
    }

    /// Create a new report.
    pub async fn create(&self, model: report_post::ActiveModel) -> AppResult<report_post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Page of live reports, newest first. Logically deleted reports
    /// are excluded.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<report_post::Model>> {
        ReportPost::find()
            .filter(report_post::Column::DeletedAt.is_null())
            .order_by_desc(report_post::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count live reports.
    pub async fn count(&self) -> AppResult<u64> {
        ReportPost::find()
            .filter(report_post::Column::DeletedAt.is_null())
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Logically delete a report: the row stays for the audit trail,
    /// with `deleted_at` set.
    pub async fn soft_delete(&self, id: i64) -> AppResult<report_post::Model> {
        let report = self.get_by_id(id).await?;

        let mut model: report_post::ActiveModel = report.into();
        model.deleted_at = Set(Some(chrono::Utc::now().into()));

        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
