use sea_orm_migration::prelude::*;

use super::m20240601_000001_create_discount_offers::DiscountOffers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(CouponCodes::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(CouponCodes::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(CouponCodes::Code).string().not_null().unique_key(),
          )
          .col(
            ColumnDef::new(CouponCodes::ExpirationDate).date_time().not_null(),
          )
          .col(
            ColumnDef::new(CouponCodes::Status)
              .string()
              .not_null()
              .default("unused"),
          )
          .col(ColumnDef::new(CouponCodes::Contact).string().null())
          .col(
            ColumnDef::new(CouponCodes::DiscountOfferId).integer().not_null(),
          )
          .col(ColumnDef::new(CouponCodes::UsedAt).date_time().null())
          .col(ColumnDef::new(CouponCodes::CreatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_coupon_codes_discount_offer")
              .from(CouponCodes::Table, CouponCodes::DiscountOfferId)
              .to(DiscountOffers::Table, DiscountOffers::Id)
              .on_delete(ForeignKeyAction::Restrict),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_coupon_codes_status_expiration")
          .table(CouponCodes::Table)
          .col(CouponCodes::Status)
          .col(CouponCodes::ExpirationDate)
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_coupon_codes_discount_offer")
          .table(CouponCodes::Table)
          .col(CouponCodes::DiscountOfferId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(CouponCodes::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum CouponCodes {
  Table,
  Id,
  Code,
  ExpirationDate,
  Status,
  Contact,
  DiscountOfferId,
  UsedAt,
  CreatedAt,
}
