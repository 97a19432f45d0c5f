//! Async action creators.
//!
//! Each one dispatches `Request`, awaits the server, then dispatches exactly
//! one of `Success` or `Fail`, so no slice is ever left loading.

use std::future::Future;

use tracing::warn;

use super::{Action, Api, Phase, Store, api};
use crate::{
  entity::{coupon_code, discount_offer, settings},
  state::Session,
  sv::{
    coupon::{CouponFilter, CouponQuote, NewCoupon},
    offer::{NewOffer, OfferFilter, OfferPatch},
    settings::SettingsPatch,
    uploads::Upload,
  },
};

async fn run<T, F>(
  store: &mut Store,
  action: fn(Phase<T>) -> Action,
  call: F,
) -> Option<T>
where
  T: Clone,
  F: Future<Output = api::Result<T>>,
{
  store.dispatch(action(Phase::Request));

  match call.await {
    Ok(payload) => {
      store.dispatch(action(Phase::Success(payload.clone())));
      Some(payload)
    }
    Err(err) => {
      let failed = action(Phase::Fail(err.to_string()));
      warn!("{} failed: {err}", failed.feature());
      store.dispatch(failed);
      None
    }
  }
}

pub async fn login(
  api: &mut Api,
  store: &mut Store,
  email: &str,
  password: &str,
) -> Option<Session> {
  let session = run(store, Action::Login, api.login(email, password)).await?;
  api.set_token(Some(session.token.clone()));
  Some(session)
}

pub async fn logout(api: &mut Api, store: &mut Store) {
  if let Err(err) = api.logout().await {
    warn!("Logout failed: {err}");
  }
  api.set_token(None);
  store.dispatch(Action::Login(Phase::Reset));
}

pub async fn list_coupons(
  api: &Api,
  store: &mut Store,
  filter: &CouponFilter,
) -> Option<Vec<coupon_code::Model>> {
  run(store, Action::CouponList, api.coupons(filter)).await
}

pub async fn create_coupon(
  api: &Api,
  store: &mut Store,
  new: &NewCoupon,
) -> Option<coupon_code::Model> {
  run(store, Action::CouponCreate, api.create_coupon(new)).await
}

pub async fn validate_coupon(
  api: &Api,
  store: &mut Store,
  code: &str,
) -> Option<CouponQuote> {
  run(store, Action::CouponValidate, api.validate_coupon(code)).await
}

pub async fn redeem_coupon(
  api: &Api,
  store: &mut Store,
  code: &str,
  contact: Option<&str>,
) -> Option<coupon_code::Model> {
  run(store, Action::CouponRedeem, api.redeem_coupon(code, contact)).await
}

pub async fn list_discounts(
  api: &Api,
  store: &mut Store,
  filter: &OfferFilter,
) -> Option<Vec<discount_offer::Model>> {
  run(store, Action::DiscountList, api.offers(filter)).await
}

pub async fn create_discount(
  api: &Api,
  store: &mut Store,
  new: &NewOffer,
) -> Option<discount_offer::Model> {
  run(store, Action::DiscountCreate, api.create_offer(new)).await
}

pub async fn update_discount(
  api: &Api,
  store: &mut Store,
  id: i32,
  patch: &OfferPatch,
) -> Option<discount_offer::Model> {
  run(store, Action::DiscountUpdate, api.update_offer(id, patch)).await
}

pub async fn settings_details(
  api: &Api,
  store: &mut Store,
) -> Option<settings::Model> {
  run(store, Action::SettingsDetails, api.settings()).await
}

pub async fn update_settings(
  api: &Api,
  store: &mut Store,
  patch: &SettingsPatch,
) -> Option<settings::Model> {
  run(store, Action::SettingsUpdate, api.update_settings(patch)).await
}

pub async fn upload_image(
  api: &Api,
  store: &mut Store,
  file_name: &str,
  content_type: &str,
  bytes: Vec<u8>,
) -> Option<Upload> {
  run(store, Action::Upload, api.upload(file_name, content_type, bytes)).await
}
