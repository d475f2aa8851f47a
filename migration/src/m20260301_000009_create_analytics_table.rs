use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Analytics::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Analytics::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Analytics::Date).date().not_null().unique_key())
                    .col(counter(Analytics::NewUsers))
                    .col(counter(Analytics::NewListings))
                    .col(counter(Analytics::TotalViews))
                    .col(counter(Analytics::NewMessages))
                    .col(counter(Analytics::NewReports))
                    .col(ColumnDef::new(Analytics::SearchTerms).json().not_null())
                    .col(ColumnDef::new(Analytics::TopModels).json().not_null())
                    .col(ColumnDef::new(Analytics::PopularLocations).json().not_null())
                    .col(ColumnDef::new(Analytics::RevenueData).json().not_null())
                    .col(
                        ColumnDef::new(Analytics::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Analytics::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Analytics::Table).to_owned())
            .await
    }
}

/// Non-null integer counter starting at zero.
fn counter(column: Analytics) -> ColumnDef {
    ColumnDef::new(column)
        .integer()
        .not_null()
        .default(0)
        .to_owned()
}

#[derive(DeriveIden)]
enum Analytics {
    Table,
    Id,
    Date,
    NewUsers,
    NewListings,
    TotalViews,
    NewMessages,
    NewReports,
    SearchTerms,
    TopModels,
    PopularLocations,
    RevenueData,
    CreatedAt,
    UpdatedAt,
}
