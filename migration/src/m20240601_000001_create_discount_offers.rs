use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(DiscountOffers::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(DiscountOffers::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(DiscountOffers::Name)
              .string()
              .not_null()
              .unique_key(),
          )
          .col(
            ColumnDef::new(DiscountOffers::DiscountPercentage)
              .double()
              .not_null(),
          )
          .col(ColumnDef::new(DiscountOffers::StartDate).date_time().not_null())
          .col(ColumnDef::new(DiscountOffers::EndDate).date_time().not_null())
          .col(
            ColumnDef::new(DiscountOffers::AvailableOn)
              .string()
              .not_null()
              .default("both"),
          )
          .col(ColumnDef::new(DiscountOffers::CreatedAt).date_time().not_null())
          .col(ColumnDef::new(DiscountOffers::UpdatedAt).date_time().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_discount_offers_window")
          .table(DiscountOffers::Table)
          .col(DiscountOffers::StartDate)
          .col(DiscountOffers::EndDate)
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_discount_offers_available_on")
          .table(DiscountOffers::Table)
          .col(DiscountOffers::AvailableOn)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(DiscountOffers::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum DiscountOffers {
  Table,
  Id,
  Name,
  DiscountPercentage,
  StartDate,
  EndDate,
  AvailableOn,
  CreatedAt,
  UpdatedAt,
}
