//! Create report_posts table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReportPosts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReportPosts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReportPosts::ReporterId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ReportPosts::ReportedPostId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReportPosts::ReportedContent).text().not_null())
                    .col(
                        ColumnDef::new(ReportPosts::ReportedUserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportPosts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ReportPosts::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_posts_reporter")
                            .from(ReportPosts::Table, ReportPosts::ReporterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_posts_reported_user")
                            .from(ReportPosts::Table, ReportPosts::ReportedUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_report_posts_reporter_id")
                    .table(ReportPosts::Table)
                    .col(ReportPosts::ReporterId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReportPosts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ReportPosts {
    Table,
    Id,
    ReporterId,
    ReportedPostId,
    ReportedContent,
    ReportedUserId,
    CreatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
