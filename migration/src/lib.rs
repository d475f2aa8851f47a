pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_user_table;
mod m20260301_000002_create_buyer_profile_table;
mod m20260301_000003_create_seller_profile_table;
mod m20260301_000004_create_car_table;
mod m20260301_000005_create_car_listing_table;
mod m20260301_000006_create_favorite_table;
mod m20260301_000007_create_message_table;
mod m20260301_000008_create_report_table;
mod m20260301_000009_create_analytics_table;
mod m20260301_000010_create_search_log_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_user_table::Migration),
            Box::new(m20260301_000002_create_buyer_profile_table::Migration),
            Box::new(m20260301_000003_create_seller_profile_table::Migration),
            Box::new(m20260301_000004_create_car_table::Migration),
            Box::new(m20260301_000005_create_car_listing_table::Migration),
            Box::new(m20260301_000006_create_favorite_table::Migration),
            Box::new(m20260301_000007_create_message_table::Migration),
            Box::new(m20260301_000008_create_report_table::Migration),
            Box::new(m20260301_000009_create_analytics_table::Migration),
            Box::new(m20260301_000010_create_search_log_table::Migration),
        ]
    }
}
