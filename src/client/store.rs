use tracing::debug;

use super::{Action, Lifecycle};
use crate::{
  entity::{coupon_code, discount_offer, settings},
  state::Session,
  sv::{coupon::CouponQuote, uploads::Upload},
};

/// All client state, one [`Lifecycle`] per feature.
#[derive(Debug, Default)]
pub struct Store {
  pub login: Lifecycle<Session>,
  pub coupon_list: Lifecycle<Vec<coupon_code::Model>>,
  pub coupon_create: Lifecycle<coupon_code::Model>,
  pub coupon_validate: Lifecycle<CouponQuote>,
  pub coupon_redeem: Lifecycle<coupon_code::Model>,
  pub discount_list: Lifecycle<Vec<discount_offer::Model>>,
  pub discount_create: Lifecycle<discount_offer::Model>,
  pub discount_update: Lifecycle<discount_offer::Model>,
  pub settings_details: Lifecycle<settings::Model>,
  pub settings_update: Lifecycle<settings::Model>,
  pub upload: Lifecycle<Upload>,
}

impl Store {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn dispatch(&mut self, action: Action) {
    debug!("dispatch {}", action.kind());

    match action {
      Action::Login(phase) => self.login.apply(phase),
      Action::CouponList(phase) => self.coupon_list.apply(phase),
      Action::CouponCreate(phase) => self.coupon_create.apply(phase),
      Action::CouponValidate(phase) => self.coupon_validate.apply(phase),
      Action::CouponRedeem(phase) => self.coupon_redeem.apply(phase),
      Action::DiscountList(phase) => self.discount_list.apply(phase),
      Action::DiscountCreate(phase) => self.discount_create.apply(phase),
      Action::DiscountUpdate(phase) => self.discount_update.apply(phase),
      Action::SettingsDetails(phase) => self.settings_details.apply(phase),
      Action::SettingsUpdate(phase) => self.settings_update.apply(phase),
      Action::Upload(phase) => self.upload.apply(phase),
    }
  }

  /// True while any workflow awaits its response
  pub fn is_busy(&self) -> bool {
    self.login.is_loading()
      || self.coupon_list.is_loading()
      || self.coupon_create.is_loading()
      || self.coupon_validate.is_loading()
      || self.coupon_redeem.is_loading()
      || self.discount_list.is_loading()
      || self.discount_create.is_loading()
      || self.discount_update.is_loading()
      || self.settings_details.is_loading()
      || self.settings_update.is_loading()
      || self.upload.is_loading()
  }

  pub fn snapshot(&self) -> json::Value {
    json::json!({
      "userLogin": self.login.view("session"),
      "couponList": self.coupon_list.view("coupons"),
      "couponCreate": self.coupon_create.view("coupon"),
      "couponValidate": self.coupon_validate.view("discount"),
      "couponRedeem": self.coupon_redeem.view("coupon"),
      "discountList": self.discount_list.view("discounts"),
      "discountCreate": self.discount_create.view("discount"),
      "discountUpdate": self.discount_update.view("discount"),
      "settingsDetails": self.settings_details.view("settings"),
      "settingsUpdate": self.settings_update.view("settings"),
      "upload": self.upload.view("upload"),
    })
  }
}
