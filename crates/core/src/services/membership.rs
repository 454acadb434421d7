//! Membership lifecycle service.
//!
//! Owns the state machine behind sign-up approval, suspension and
//! withdrawal. Every transition is guarded: it loads the current row,
//! checks the state it requires, and fails with `InvalidState` when
//! the account is not where the transition expects it to be.

use chrono::Utc;
use plaza_common::{AppError, AppResult};
use plaza_db::entities::user::{self, MembershipStatus};
use plaza_db::repositories::UserRepository;
use sea_orm::Set;
use tracing::info;

/// Administrator's verdict on a pending sign-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    Approve,
    Reject,
}

/// Service for membership state transitions.
#[derive(Clone)]
pub struct MembershipService {
    user_repo: UserRepository,
}

impl MembershipService {
    /// Create a new membership service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Decide a pending sign-up.
    ///
    /// Approval activates the account; rejection parks it in the
    /// rejected state. A rejected account may be re-decided later,
    /// which is why it still shows up on the pending listing.
    pub async fn approve_or_reject(
        &self,
        user_id: i64,
        decision: ApprovalDecision,
    ) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;

        if !matches!(
            user.membership_status,
            MembershipStatus::PendingVerification | MembershipStatus::Rejected
        ) {
            return Err(AppError::InvalidState(format!(
                "User {user_id} is not awaiting approval"
            )));
        }

        let mut model: user::ActiveModel = user.into();
        match decision {
            ApprovalDecision::Approve => {
                model.membership_status = Set(MembershipStatus::Active);
                model.rejected = Set(false);
            }
            ApprovalDecision::Reject => {
                model.membership_status = Set(MembershipStatus::Rejected);
                model.rejected = Set(true);
            }
        }
        model.updated_at = Set(Some(Utc::now().into()));

        let updated = self.user_repo.update(model).await?;
        info!(user_id, decision = ?decision, "Sign-up decided");
        Ok(updated)
    }

    /// Suspend an active account, recording the reason shown to the
    /// member when they next try to sign in.
    pub async fn suspend(&self, user_id: i64, reason: &str) -> AppResult<user::Model> {
        if reason.trim().is_empty() {
            return Err(AppError::Validation(
                "Suspension reason must not be empty".to_string(),
            ));
        }

        let user = self.user_repo.get_by_id(user_id).await?;

        if user.membership_status != MembershipStatus::Active {
            return Err(AppError::InvalidState(format!(
                "User {user_id} is not active and cannot be suspended"
            )));
        }

        let mut model: user::ActiveModel = user.into();
        model.membership_status = Set(MembershipStatus::Suspended);
        model.suspension_reason = Set(Some(reason.to_string()));
        model.updated_at = Set(Some(Utc::now().into()));

        let updated = self.user_repo.update(model).await?;
        info!(user_id, "User suspended");
        Ok(updated)
    }

    /// Lift a suspension, returning the account to active.
    pub async fn cancel_suspension(&self, user_id: i64) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;

        if user.membership_status != MembershipStatus::Suspended {
            return Err(AppError::InvalidState(format!(
                "User {user_id} is not suspended"
            )));
        }

        let mut model: user::ActiveModel = user.into();
        model.membership_status = Set(MembershipStatus::Active);
        model.suspension_reason = Set(None);
        model.updated_at = Set(Some(Utc::now().into()));

        let updated = self.user_repo.update(model).await?;
        info!(user_id, "Suspension lifted");
        Ok(updated)
    }

    /// Withdraw an account on the administrator's behalf.
    ///
    /// The row is soft-deleted and the previous status is kept so that
    /// a later cancellation can restore it exactly. The guard is the
    /// soft-delete marker itself, not the status column.
    pub async fn withdraw(&self, user_id: i64) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;

        if user.deleted_at.is_some() {
            return Err(AppError::InvalidState(format!(
                "User {user_id} is already withdrawn"
            )));
        }

        let prior = user.membership_status;
        let mut model: user::ActiveModel = user.into();
        model.membership_status = Set(MembershipStatus::Withdrawn);
        model.status_before_withdrawal = Set(Some(prior));
        model.deleted_at = Set(Some(Utc::now().into()));
        model.token = Set(None);
        model.updated_at = Set(Some(Utc::now().into()));

        let updated = self.user_repo.update(model).await?;
        info!(user_id, "User withdrawn");
        Ok(updated)
    }

    /// Undo a withdrawal, restoring the status the account held before
    /// it was withdrawn and clearing the soft-delete marker.
    pub async fn cancel_withdrawal(&self, user_id: i64) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;

        if user.deleted_at.is_none() {
            return Err(AppError::InvalidState(format!(
                "User {user_id} is not withdrawn"
            )));
        }

        let restored = user
            .status_before_withdrawal
            .unwrap_or(MembershipStatus::Active);

        let mut model: user::ActiveModel = user.into();
        model.membership_status = Set(restored);
        model.status_before_withdrawal = Set(None);
        model.deleted_at = Set(None);
        model.updated_at = Set(Some(Utc::now().into()));

        let updated = self.user_repo.update(model).await?;
        info!(user_id, "Withdrawal cancelled");
        Ok(updated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_user(id: i64, status: MembershipStatus) -> user::Model {
        user::Model {
            id,
            email: format!("user{id}@example.com"),
            password_hash: "$argon2id$test".to_string(),
            nickname: "tester".to_string(),
            username: None,
            phone_number: None,
            membership_status: status,
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

    fn service(db: MockDatabase) -> MembershipService {
        MembershipService::new(UserRepository::new(Arc::new(db.into_connection())))
    }

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    #[tokio::test]
    async fn approve_activates_pending_user() {
        let pending = test_user(1, MembershipStatus::PendingVerification);
        let mut approved = pending.clone();
        approved.membership_status = MembershipStatus::Active;

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending], [approved]])
                .append_exec_results([exec_ok()]),
        );

        let result = svc
            .approve_or_reject(1, ApprovalDecision::Approve)
            .await
            .unwrap();

        assert_eq!(result.membership_status, MembershipStatus::Active);
        assert!(!result.rejected);
    }

    #[tokio::test]
    async fn reject_marks_user_rejected() {
        let pending = test_user(1, MembershipStatus::PendingVerification);
        let mut rejected = pending.clone();
        rejected.membership_status = MembershipStatus::Rejected;
        rejected.rejected = true;

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending], [rejected]])
                .append_exec_results([exec_ok()]),
        );

        let result = svc
            .approve_or_reject(1, ApprovalDecision::Reject)
            .await
            .unwrap();

        assert_eq!(result.membership_status, MembershipStatus::Rejected);
        assert!(result.rejected);
    }

    #[tokio::test]
    async fn approve_active_user_fails() {
        let active = test_user(1, MembershipStatus::Active);

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[active]]),
        );

        let result = svc.approve_or_reject(1, ApprovalDecision::Approve).await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn approve_unknown_user_fails() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()]),
        );

        let result = svc.approve_or_reject(99, ApprovalDecision::Approve).await;
        assert!(matches!(result, Err(AppError::UserNotFound(99))));
    }

    #[tokio::test]
    async fn suspend_active_user_records_reason() {
        let active = test_user(1, MembershipStatus::Active);
        let mut suspended = active.clone();
        suspended.membership_status = MembershipStatus::Suspended;
        suspended.suspension_reason = Some("spam".to_string());

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[active], [suspended]])
                .append_exec_results([exec_ok()]),
        );

        let result = svc.suspend(1, "spam").await.unwrap();

        assert_eq!(result.membership_status, MembershipStatus::Suspended);
        assert_eq!(result.suspension_reason.as_deref(), Some("spam"));
    }

    #[tokio::test]
    async fn suspend_twice_fails() {
        let suspended = test_user(1, MembershipStatus::Suspended);

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[suspended]]),
        );

        let result = svc.suspend(1, "again").await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn suspend_with_blank_reason_fails() {
        let svc = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = svc.suspend(1, "   ").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn cancel_suspension_restores_active() {
        let mut suspended = test_user(1, MembershipStatus::Suspended);
        suspended.suspension_reason = Some("spam".to_string());
        let restored = test_user(1, MembershipStatus::Active);

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[suspended], [restored]])
                .append_exec_results([exec_ok()]),
        );

        let result = svc.cancel_suspension(1).await.unwrap();

        assert_eq!(result.membership_status, MembershipStatus::Active);
        assert!(result.suspension_reason.is_none());
    }

    #[tokio::test]
    async fn cancel_suspension_of_active_user_fails() {
        let active = test_user(1, MembershipStatus::Active);

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[active]]),
        );

        let result = svc.cancel_suspension(1).await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn withdraw_records_prior_status_and_soft_deletes() {
        let active = test_user(1, MembershipStatus::Active);
        let mut withdrawn = active.clone();
        withdrawn.membership_status = MembershipStatus::Withdrawn;
        withdrawn.status_before_withdrawal = Some(MembershipStatus::Active);
        withdrawn.deleted_at = Some(Utc::now().into());

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[active], [withdrawn]])
                .append_exec_results([exec_ok()]),
        );

        let result = svc.withdraw(1).await.unwrap();

        assert_eq!(result.membership_status, MembershipStatus::Withdrawn);
        assert_eq!(
            result.status_before_withdrawal,
            Some(MembershipStatus::Active)
        );
        assert!(result.deleted_at.is_some());
    }

    #[tokio::test]
    async fn withdraw_twice_fails() {
        let mut withdrawn = test_user(1, MembershipStatus::Withdrawn);
        withdrawn.deleted_at = Some(Utc::now().into());

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[withdrawn]]),
        );

        let result = svc.withdraw(1).await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn cancel_withdrawal_restores_prior_status() {
        let mut withdrawn = test_user(1, MembershipStatus::Withdrawn);
        withdrawn.status_before_withdrawal = Some(MembershipStatus::Suspended);
        withdrawn.deleted_at = Some(Utc::now().into());

        let mut restored = test_user(1, MembershipStatus::Suspended);
        restored.status_before_withdrawal = None;
        restored.deleted_at = None;

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[withdrawn], [restored]])
                .append_exec_results([exec_ok()]),
        );

        let result = svc.cancel_withdrawal(1).await.unwrap();

        assert_eq!(result.membership_status, MembershipStatus::Suspended);
        assert!(result.deleted_at.is_none());
        assert!(result.status_before_withdrawal.is_none());
    }

    #[tokio::test]
    async fn cancel_withdrawal_of_active_user_fails() {
        let active = test_user(1, MembershipStatus::Active);

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[active]]),
        );

        let result = svc.cancel_withdrawal(1).await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn cancel_withdrawal_without_soft_delete_marker_fails() {
        // A row that claims to be withdrawn but carries no deleted_at
        // is not restorable; the marker is the contract.
        let stale = test_user(1, MembershipStatus::Withdrawn);

        let svc =
            service(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[stale]]));

        let result = svc.cancel_withdrawal(1).await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }
}
