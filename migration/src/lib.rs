//! Database migrations using SeaORM

pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_discount_offers;
mod m20240601_000002_create_coupon_codes;
mod m20240601_000003_create_settings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20240601_000001_create_discount_offers::Migration),
      Box::new(m20240601_000002_create_coupon_codes::Migration),
      Box::new(m20240601_000003_create_settings::Migration),
    ]
  }
}
