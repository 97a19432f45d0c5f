//! Coupon code entity - single-use redemption codes tied to an offer

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

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
pub enum CouponStatus {
  #[default]
  #[sea_orm(string_value = "unused")]
  Unused,
  #[sea_orm(string_value = "used")]
  Used,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coupon_codes")]
#[serde(rename_all = "camelCase")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  /// Always stored trimmed and uppercased
  #[sea_orm(unique)]
  pub code: String,
  pub expiration_date: DateTime,
  pub status: CouponStatus,
  /// Opaque id of whoever redeemed the code
  pub contact: Option<String>,
  pub discount_offer_id: i32,
  pub used_at: Option<DateTime>,
  pub created_at: DateTime,
}

impl Model {
  pub fn is_expired_at(&self, at: DateTime) -> bool {
    at > self.expiration_date
  }

  pub fn is_usable_at(&self, at: DateTime) -> bool {
    self.status == CouponStatus::Unused && !self.is_expired_at(at)
  }
}

/// Canonical form of a coupon code: trimmed and uppercased.
pub fn normalize(code: &str) -> String {
  code.trim().to_uppercase()
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "super::discount_offer::Entity",
    from = "Column::DiscountOfferId",
    to = "super::discount_offer::Column::Id"
  )]
  DiscountOffer,
}

impl Related<super::discount_offer::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::DiscountOffer.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
