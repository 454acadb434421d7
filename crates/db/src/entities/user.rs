//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Membership lifecycle stage of a user account.
///
/// Controls visibility and permitted actions. Accounts start in
/// `PendingVerification` and are moved by administrator decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum MembershipStatus {
    #[sea_orm(string_value = "pending_verification")]
    #[default]
    PendingVerification,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "suspended")]
    Suspended,
    #[sea_orm(string_value = "withdrawn")]
    Withdrawn,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 password hash
    pub password_hash: String,

    /// Display name
    pub nickname: String,

    /// Legal name, populated after identity verification
    #[sea_orm(nullable)]
    pub username: Option<String>,

    #[sea_orm(nullable)]
    pub phone_number: Option<String>,

    pub membership_status: MembershipStatus,

    /// Set when an administrator rejects the registration.
    ///
    /// Kept alongside `membership_status`; nothing reconciles the two
    /// signals, a known consistency gap inherited from the data model.
    #[sea_orm(default_value = false)]
    pub rejected: bool,

    /// Status the account held before withdrawal, so cancellation can
    /// restore it. NULL unless the account is withdrawn.
    #[sea_orm(nullable)]
    pub status_before_withdrawal: Option<MembershipStatus>,

    /// Reason supplied with the most recent suspension
    #[sea_orm(column_type = "Text", nullable)]
    pub suspension_reason: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_admin: bool,

    /// Opaque bearer credential
    #[sea_orm(unique, nullable)]
    pub token: Option<String>,

    /// Soft-delete marker. A set value excludes the row from normal
    /// listings but keeps it retrievable for withdrawal cancellation.
    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Posts,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
