//! Post report entity.
//!
//! Reports are logically deleted (timestamp set) rather than removed,
//! preserving the moderation audit trail. The reported content is
//! snapshotted at report time so it survives deletion of the post.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report_posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// User who filed the report
    #[sea_orm(indexed)]
    pub reporter_id: i64,

    /// ID of the reported post
    pub reported_post_id: i64,

    /// Snapshot of the reported content at report time
    #[sea_orm(column_type = "Text")]
    pub reported_content: String,

    /// Author of the reported post
    #[sea_orm(indexed)]
    pub reported_user_id: i64,

    pub created_at: DateTimeWithTimeZone,

    /// Logical deletion marker
    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReporterId",
        to = "super::user::Column::Id"
    )]
    Reporter,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReportedUserId",
        to = "super::user::Column::Id"
    )]
    ReportedUser,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reporter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
