use sea_orm_migration::prelude::*;

/// Creates the `report` table.
///
/// A report targets exactly one of a listing or a user. Deleting the reviewer nulls
/// `reviewed_by_id` so the moderation history survives.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Report::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Report::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Report::ReporterId).uuid().not_null())
                    .col(ColumnDef::new(Report::ReportedListingId).uuid().null())
                    .col(ColumnDef::new(Report::ReportedUserId).uuid().null())
                    .col(ColumnDef::new(Report::Reason).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Report::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Report::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Report::ReviewedById).uuid().null())
                    .col(
                        ColumnDef::new(Report::ReviewedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Report::AdminNotes)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Report::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_reporter_id")
                            .from(Report::Table, Report::ReporterId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_reported_listing_id")
                            .from(Report::Table, Report::ReportedListingId)
                            .to(CarListing::Table, CarListing::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_reported_user_id")
                            .from(Report::Table, Report::ReportedUserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_reviewed_by_id")
                            .from(Report::Table, Report::ReviewedById)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_report_status", Report::Status),
            ("idx_report_reason", Report::Reason),
            ("idx_report_created_at", Report::CreatedAt),
            ("idx_report_reporter_id", Report::ReporterId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Report::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Report::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Report {
    Table,
    Id,
    ReporterId,
    ReportedListingId,
    ReportedUserId,
    Reason,
    Description,
    Status,
    ReviewedById,
    ReviewedAt,
    AdminNotes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum CarListing {
    Table,
    Id,
}
