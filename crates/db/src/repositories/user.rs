//! User repository.

use std::sync::Arc;

use crate::entities::{User, comment, post, user, user::MembershipStatus};
use plaza_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    prelude::DateTimeWithTimeZone, sea_query::Expr,
};
use serde::Serialize;

/// A user row enriched with post and comment counts, as shown on the
/// administrator's member list.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithCounts {
    pub id: i64,
    pub nickname: String,
    pub email: String,
    pub post_count: i64,
    pub comment_count: i64,
    pub created_at: DateTimeWithTimeZone,
}

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i64) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or(AppError::UserNotFound(id))
    }

    /// Find a user by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by bearer token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a user.
    pub async fn update(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all users, including soft-deleted ones.
    ///
    /// Feeds the `total` field of the member-list envelope, which the
    /// admin screen shows against the page contents.
    pub async fn count_all(&self) -> AppResult<u64> {
        User::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Page of users with per-user post and comment counts, newest first.
    ///
    /// LEFT JOINs posts and comments and groups by the user primary key;
    /// counts are DISTINCT so the two joins do not inflate each other.
    pub async fn list_with_counts(&self, limit: u64, offset: u64) -> AppResult<Vec<UserWithCounts>> {
        User::find()
            .select_only()
            .column(user::Column::Id)
            .column(user::Column::Nickname)
            .column(user::Column::Email)
            .column(user::Column::CreatedAt)
            .column_as(
                Expr::col((post::Entity, post::Column::Id)).count_distinct(),
                "post_count",
            )
            .column_as(
                Expr::col((comment::Entity, comment::Column::Id)).count_distinct(),
                "comment_count",
            )
            .join(JoinType::LeftJoin, user::Relation::Posts.def())
            .join(JoinType::LeftJoin, user::Relation::Comments.def())
            .group_by(user::Column::Id)
            .order_by_desc(user::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .into_model::<UserWithCounts>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn pending_condition() -> Condition {
        // Awaiting verification or denied it; soft-deleted rows never
        // appear here regardless of status.
        Condition::all()
            .add(user::Column::DeletedAt.is_null())
            .add(
                Condition::any()
                    .add(
                        user::Column::MembershipStatus.eq(MembershipStatus::PendingVerification),
                    )
                    .add(user::Column::Rejected.eq(true)),
            )
    }

    /// Page of users pending approval or previously rejected, newest first.
    pub async fn list_pending(&self, limit: u64, offset: u64) -> AppResult<Vec<user::Model>> {
        User::find()
            .filter(Self::pending_condition())
            .order_by_desc(user::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count users matching the pending-approval listing.
    pub async fn count_pending(&self) -> AppResult<u64> {
        User::find()
            .filter(Self::pending_condition())
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};
    use std::sync::Arc;

    fn create_test_user(id: i64, email: &str) -> user::Model {
        user::Model {
            id,
            email: email.to_string(),
            password_hash: "$argon2id$test".to_string(),
            nickname: "tester".to_string(),
            username: None,
            phone_number: None,
            membership_status: MembershipStatus::PendingVerification,
            rejected: false,
            status_before_withdrawal: None,
            suspension_reason: None,
            is_admin: false,
            token: None,
            deleted_at: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let user = create_test_user(1, "a@example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_id(1).await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().email, "a@example.com");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.get_by_id(99).await;

        match result {
            Err(AppError::UserNotFound(id)) => assert_eq!(id, 99),
            _ => panic!("Expected UserNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let user = create_test_user(1, "a@example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_email("a@example.com").await.unwrap();

        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_create_user() {
        let user = create_test_user(1, "new@example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 1,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let active = user::ActiveModel {
            email: Set("new@example.com".to_string()),
            password_hash: Set("$argon2id$test".to_string()),
            nickname: Set("tester".to_string()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let result = repo.create(active).await.unwrap();
        assert_eq!(result.email, "new@example.com");
    }

    #[tokio::test]
    async fn test_list_pending() {
        let pending = create_test_user(1, "pending@example.com");
        let mut rejected = create_test_user(2, "rejected@example.com");
        rejected.membership_status = MembershipStatus::Rejected;
        rejected.rejected = true;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending, rejected]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.list_pending(10, 0).await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_pending_filter_excludes_soft_deleted() {
        use sea_orm::{DatabaseBackend, QueryTrait};

        let sql = User::find()
            .filter(UserRepository::pending_condition())
            .build(DatabaseBackend::Postgres)
            .to_string();

        // Soft-deleted rows are always excluded
        assert!(sql.contains(r#""users"."deleted_at" IS NULL"#));
        // Pending OR previously rejected, not the two predicates alone
        assert!(sql.contains(r#""users"."membership_status" = 'pending_verification'"#));
        assert!(sql.contains(r#"OR "users"."rejected" = TRUE"#));
    }

    #[tokio::test]
    async fn test_list_with_counts() {
        use sea_orm::Value;
        use std::collections::BTreeMap;

        let row: BTreeMap<&str, Value> = BTreeMap::from([
            ("id", Value::BigInt(Some(1))),
            ("nickname", Value::from("tester")),
            ("email", Value::from("a@example.com")),
            ("post_count", Value::BigInt(Some(3))),
            ("comment_count", Value::BigInt(Some(5))),
            (
                "created_at",
                Value::from(DateTimeWithTimeZone::from(Utc::now())),
            ),
        ]);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[row]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.list_with_counts(10, 0).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].post_count, 3);
        assert_eq!(result[0].comment_count, 5);
    }
}
