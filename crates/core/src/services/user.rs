//! User account service.
//!
//! Sign-up, sign-in and profile self-service. New accounts start in
//! the pending state and cannot sign in until an administrator
//! approves them; the sign-in gate here is where every non-active
//! membership state is turned away.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use plaza_common::{AppError, AppResult};
use plaza_db::entities::user::{self, MembershipStatus};
use plaza_db::repositories::UserRepository;
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// User service for account business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

/// Input for signing up a new member.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 64))]
    pub nickname: String,

    #[validate(length(min = 1, max = 64))]
    pub username: Option<String>,

    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
}

/// Input for changing one's own password.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    pub current_password: String,

    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Register a new member. The account lands in the pending state
    /// and waits for an administrator's decision.
    pub async fn register(&self, input: RegisterInput) -> AppResult<user::Model> {
        input.validate()?;

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            email: Set(input.email),
            password_hash: Set(password_hash),
            nickname: Set(input.nickname),
            username: Set(input.username),
            phone_number: Set(input.phone_number),
            membership_status: Set(MembershipStatus::PendingVerification),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let user = self.user_repo.create(model).await?;
        info!(user_id = user.id, "New sign-up pending approval");
        Ok(user)
    }

    /// Authenticate by email and password, issuing a fresh bearer
    /// token on success.
    ///
    /// Only active members get through; every other membership state
    /// is refused with a message naming where the account stands.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        Self::check_membership_gate(&user)?;

        self.issue_token(user).await
    }

    /// Authenticate an administrator. Same gate as `authenticate`,
    /// plus the admin flag.
    pub async fn authenticate_admin(&self, email: &str, password: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        if !user.is_admin {
            return Err(AppError::Forbidden(
                "Administrator privileges required".to_string(),
            ));
        }

        Self::check_membership_gate(&user)?;

        self.issue_token(user).await
    }

    /// Authenticate by bearer token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        // Tokens outlive a state change until next sign-in unless we
        // gate here as well.
        Self::check_membership_gate(&user)?;

        Ok(user)
    }

    /// Invalidate the current bearer token.
    pub async fn sign_out(&self, user_id: i64) -> AppResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;

        let mut model: user::ActiveModel = user.into();
        model.token = Set(None);
        model.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(model).await?;
        Ok(())
    }

    /// Change the member's display nickname.
    pub async fn update_nickname(&self, user_id: i64, nickname: &str) -> AppResult<user::Model> {
        let trimmed = nickname.trim();
        if trimmed.is_empty() || trimmed.len() > 64 {
            return Err(AppError::Validation(
                "Nickname must be between 1 and 64 characters".to_string(),
            ));
        }

        let user = self.user_repo.get_by_id(user_id).await?;

        let mut model: user::ActiveModel = user.into();
        model.nickname = Set(trimmed.to_string());
        model.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(model).await
    }

    /// Change the member's password after verifying the current one.
    pub async fn change_password(
        &self,
        user_id: i64,
        input: ChangePasswordInput,
    ) -> AppResult<()> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;

        if !verify_password(&input.current_password, &user.password_hash)? {
            return Err(AppError::Forbidden(
                "Current password does not match".to_string(),
            ));
        }

        let password_hash = hash_password(&input.new_password)?;

        let mut model: user::ActiveModel = user.into();
        model.password_hash = Set(password_hash);
        model.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(model).await?;
        info!(user_id, "Password changed");
        Ok(())
    }

    fn check_membership_gate(user: &user::Model) -> AppResult<()> {
        match user.membership_status {
            MembershipStatus::Active => Ok(()),
            MembershipStatus::PendingVerification => Err(AppError::Forbidden(
                "Membership approval is pending".to_string(),
            )),
            MembershipStatus::Rejected => Err(AppError::Forbidden(
                "Sign-up was rejected".to_string(),
            )),
            MembershipStatus::Suspended => {
                let reason = user
                    .suspension_reason
                    .as_deref()
                    .unwrap_or("No reason given");
                Err(AppError::Forbidden(format!("Account suspended: {reason}")))
            }
            MembershipStatus::Withdrawn => {
                Err(AppError::Forbidden("Account has been withdrawn".to_string()))
            }
        }
    }

    async fn issue_token(&self, user: user::Model) -> AppResult<user::Model> {
        let token = Uuid::new_v4().simple().to_string();

        let mut model: user::ActiveModel = user.into();
        model.token = Set(Some(token));
        model.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(model).await
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_user(id: i64, status: MembershipStatus, password: &str) -> user::Model {
        user::Model {
            id,
            email: format!("user{id}@example.com"),
            password_hash: hash_password(password).unwrap(),
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

    fn service(db: MockDatabase) -> UserService {
        UserService::new(UserRepository::new(Arc::new(db.into_connection())))
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("secret_password").unwrap();
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("secret_password").unwrap();
        assert!(verify_password("secret_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("secret_password").unwrap();
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[tokio::test]
    async fn register_duplicate_email_fails() {
        let existing = test_user(1, MembershipStatus::Active, "password123");

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[existing]]),
        );

        let input = RegisterInput {
            email: "user1@example.com".to_string(),
            password: "password123".to_string(),
            nickname: "dupe".to_string(),
            username: None,
            phone_number: None,
        };

        let result = svc.register(input).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn register_invalid_email_fails() {
        let svc = service(MockDatabase::new(DatabaseBackend::Postgres));

        let input = RegisterInput {
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
            nickname: "tester".to_string(),
            username: None,
            phone_number: None,
        };

        let result = svc.register(input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn authenticate_pending_user_is_refused() {
        let pending = test_user(1, MembershipStatus::PendingVerification, "password123");

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[pending]]),
        );

        let result = svc.authenticate("user1@example.com", "password123").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn authenticate_suspended_user_names_reason() {
        let mut suspended = test_user(1, MembershipStatus::Suspended, "password123");
        suspended.suspension_reason = Some("spam".to_string());

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[suspended]]),
        );

        let result = svc.authenticate("user1@example.com", "password123").await;
        match result {
            Err(AppError::Forbidden(msg)) => assert!(msg.contains("spam")),
            _ => panic!("Expected Forbidden error"),
        }
    }

    #[tokio::test]
    async fn authenticate_wrong_password_is_unauthorized() {
        let active = test_user(1, MembershipStatus::Active, "password123");

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[active]]),
        );

        let result = svc.authenticate("user1@example.com", "wrong").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn authenticate_active_user_rotates_token() {
        let active = test_user(1, MembershipStatus::Active, "password123");
        let mut with_token = active.clone();
        with_token.token = Some(Uuid::new_v4().simple().to_string());

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[active], [with_token]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }]),
        );

        let result = svc
            .authenticate("user1@example.com", "password123")
            .await
            .unwrap();

        assert!(result.token.is_some());
    }

    #[tokio::test]
    async fn authenticate_admin_requires_flag() {
        let plain = test_user(1, MembershipStatus::Active, "password123");

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[plain]]),
        );

        let result = svc
            .authenticate_admin("user1@example.com", "password123")
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn change_password_wrong_current_fails() {
        let active = test_user(1, MembershipStatus::Active, "password123");

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[active]]),
        );

        let input = ChangePasswordInput {
            current_password: "wrong".to_string(),
            new_password: "newpassword1".to_string(),
        };

        let result = svc.change_password(1, input).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
