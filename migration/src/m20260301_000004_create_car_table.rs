use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Car::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Car::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Car::Make).string_len(100).not_null())
                    .col(ColumnDef::new(Car::Model).string_len(100).not_null())
                    .col(ColumnDef::new(Car::Year).integer().not_null())
                    .col(ColumnDef::new(Car::Mileage).integer().not_null())
                    .col(ColumnDef::new(Car::FuelType).string_len(20).not_null())
                    .col(ColumnDef::new(Car::Transmission).string_len(20).not_null())
                    .col(ColumnDef::new(Car::Color).string_len(50).not_null())
                    .col(ColumnDef::new(Car::EngineSize).string_len(20).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_car_make_model")
                    .table(Car::Table)
                    .col(Car::Make)
                    .col(Car::Model)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_car_year")
                    .table(Car::Table)
                    .col(Car::Year)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Car::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Car {
    Table,
    Id,
    Make,
    Model,
    Year,
    Mileage,
    FuelType,
    Transmission,
    Color,
    EngineSize,
}
