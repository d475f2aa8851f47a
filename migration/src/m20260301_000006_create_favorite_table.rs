use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Favorite::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Favorite::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Favorite::UserId).uuid().not_null())
                    .col(ColumnDef::new(Favorite::ListingId).uuid().not_null())
                    .col(
                        ColumnDef::new(Favorite::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_user_id")
                            .from(Favorite::Table, Favorite::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_listing_id")
                            .from(Favorite::Table, Favorite::ListingId)
                            .to(CarListing::Table, CarListing::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One favorite per (user, listing) pair
        manager
            .create_index(
                Index::create()
                    .name("uq_favorite_user_listing")
                    .table(Favorite::Table)
                    .col(Favorite::UserId)
                    .col(Favorite::ListingId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_user_created_at")
                    .table(Favorite::Table)
                    .col(Favorite::UserId)
                    .col(Favorite::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Favorite::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Favorite {
    Table,
    Id,
    UserId,
    ListingId,
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
