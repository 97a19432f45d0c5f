use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Settings::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Settings::Id).integer().not_null().primary_key(),
          )
          .col(
            ColumnDef::new(Settings::AutomaticInvoicing)
              .boolean()
              .not_null()
              .default(true),
          )
          .col(ColumnDef::new(Settings::UpdatedAt).date_time().not_null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Settings::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Settings {
  Table,
  Id,
  AutomaticInvoicing,
  UpdatedAt,
}
