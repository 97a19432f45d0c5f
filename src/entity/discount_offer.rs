//! Discount offer entity - a percentage discount valid over a date window

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sales channel an offer applies to
#[derive(
  Clone,
  Copy,
  Debug,
  Default,
  PartialEq,
  Eq,
  Hash,
  EnumIter,
  DeriveActiveEnum,
  Serialize,
  Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Channel {
  #[sea_orm(string_value = "sales")]
  Sales,
  #[sea_orm(string_value = "website")]
  Website,
  #[default]
  #[sea_orm(string_value = "both")]
  Both,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "discount_offers")]
#[serde(rename_all = "camelCase")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  #[sea_orm(unique)]
  pub name: String,
  pub discount_percentage: f64,
  pub start_date: DateTime,
  pub end_date: DateTime,
  pub available_on: Channel,
  pub created_at: DateTime,
  pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::coupon_code::Entity")]
  Coupons,
}

impl Related<super::coupon_code::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Coupons.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
