use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CarListing::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CarListing::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CarListing::CarId).uuid().not_null())
                    .col(ColumnDef::new(CarListing::SellerId).uuid().not_null())
                    .col(
                        ColumnDef::new(CarListing::Price)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CarListing::Description).text().not_null())
                    .col(ColumnDef::new(CarListing::Location).string_len(255).not_null())
                    .col(
                        ColumnDef::new(CarListing::Status)
                            .string_len(20)
                            .not_null()
                            .default("available"),
                    )
                    .col(
                        ColumnDef::new(CarListing::Views)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CarListing::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CarListing::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_car_listing_car_id")
                            .from(CarListing::Table, CarListing::CarId)
                            .to(Car::Table, Car::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_car_listing_seller_id")
                            .from(CarListing::Table, CarListing::SellerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_car_listing_status", CarListing::Status),
            ("idx_car_listing_price", CarListing::Price),
            ("idx_car_listing_created_at", CarListing::CreatedAt),
            ("idx_car_listing_location", CarListing::Location),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(CarListing::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CarListing::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CarListing {
    Table,
    Id,
    CarId,
    SellerId,
    Price,
    Description,
    Location,
    Status,
    Views,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Car {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
