use crate::{
  entity::{coupon_code, discount_offer, settings},
  state::Session,
  sv::{coupon::CouponQuote, uploads::Upload},
};

/// Stage of one asynchronous workflow
#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
  Request,
  Success(T),
  Fail(String),
  Reset,
}

impl<T> Phase<T> {
  pub fn name(&self) -> &'static str {
    match self {
      Phase::Request => "REQUEST",
      Phase::Success(_) => "SUCCESS",
      Phase::Fail(_) => "FAIL",
      Phase::Reset => "RESET",
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
  Login(Phase<Session>),
  CouponList(Phase<Vec<coupon_code::Model>>),
  CouponCreate(Phase<coupon_code::Model>),
  CouponValidate(Phase<CouponQuote>),
  CouponRedeem(Phase<coupon_code::Model>),
  DiscountList(Phase<Vec<discount_offer::Model>>),
  DiscountCreate(Phase<discount_offer::Model>),
  DiscountUpdate(Phase<discount_offer::Model>),
  SettingsDetails(Phase<settings::Model>),
  SettingsUpdate(Phase<settings::Model>),
  Upload(Phase<Upload>),
}

impl Action {
  pub fn feature(&self) -> &'static str {
    match self {
      Action::Login(_) => "USER_LOGIN",
      Action::CouponList(_) => "COUPON_LIST",
      Action::CouponCreate(_) => "COUPON_CREATE",
      Action::CouponValidate(_) => "COUPON_VALIDATE",
      Action::CouponRedeem(_) => "COUPON_REDEEM",
      Action::DiscountList(_) => "DISCOUNT_LIST",
      Action::DiscountCreate(_) => "DISCOUNT_CREATE",
      Action::DiscountUpdate(_) => "DISCOUNT_UPDATE",
      Action::SettingsDetails(_) => "SETTINGS_DETAILS",
      Action::SettingsUpdate(_) => "SETTINGS_UPDATE",
      Action::Upload(_) => "UPLOAD_IMAGE",
    }
  }

  pub fn phase(&self) -> &'static str {
    match self {
      Action::Login(p) => p.name(),
      Action::CouponList(p) => p.name(),
      Action::CouponCreate(p) => p.name(),
      Action::CouponValidate(p) => p.name(),
      Action::CouponRedeem(p) => p.name(),
      Action::DiscountList(p) => p.name(),
      Action::DiscountCreate(p) => p.name(),
      Action::DiscountUpdate(p) => p.name(),
      Action::SettingsDetails(p) => p.name(),
      Action::SettingsUpdate(p) => p.name(),
      Action::Upload(p) => p.name(),
    }
  }

  /// Conventional action type, e.g. `COUPON_CREATE_SUCCESS`
  pub fn kind(&self) -> String {
    format!("{}_{}", self.feature(), self.phase())
  }
}
