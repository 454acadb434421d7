//! Create users table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string_len(320).not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string_len(256).not_null())
                    .col(ColumnDef::new(Users::Nickname).string_len(128).not_null())
                    .col(ColumnDef::new(Users::Username).string_len(128))
                    .col(ColumnDef::new(Users::PhoneNumber).string_len(32))
                    .col(
                        ColumnDef::new(Users::MembershipStatus)
                            .string_len(32)
                            .not_null()
                            .default("pending_verification"),
                    )
                    .col(ColumnDef::new(Users::Rejected).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::StatusBeforeWithdrawal).string_len(32))
                    .col(ColumnDef::new(Users::SuspensionReason).text())
                    .col(ColumnDef::new(Users::IsAdmin).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::Token).string_len(64))
                    .col(ColumnDef::new(Users::DeletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_token")
                    .table(Users::Table)
                    .col(Users::Token)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Drives the pending-approval listing
        manager
            .create_index(
                Index::create()
                    .name("idx_users_membership_status")
                    .table(Users::Table)
                    .col(Users::MembershipStatus)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_created_at")
                    .table(Users::Table)
                    .col(Users::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    Nickname,
    Username,
    PhoneNumber,
    MembershipStatus,
    Rejected,
    StatusBeforeWithdrawal,
    SuspensionReason,
    IsAdmin,
    Token,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}
