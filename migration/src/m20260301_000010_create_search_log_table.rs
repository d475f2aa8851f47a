use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SearchLog::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SearchLog::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SearchLog::Query).string_len(255).not_null())
                    .col(
                        ColumnDef::new(SearchLog::ResultsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SearchLog::UserId).uuid().null())
                    .col(ColumnDef::new(SearchLog::IpAddress).string_len(45).null())
                    .col(
                        ColumnDef::new(SearchLog::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_search_log_user_id")
                            .from(SearchLog::Table, SearchLog::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_search_log_timestamp")
                    .table(SearchLog::Table)
                    .col(SearchLog::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_search_log_query")
                    .table(SearchLog::Table)
                    .col(SearchLog::Query)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SearchLog::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SearchLog {
    Table,
    Id,
    Query,
    ResultsCount,
    UserId,
    IpAddress,
    Timestamp,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
