use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
};
use serde::{Deserialize, Serialize};

use super::Admin;
use crate::{
  entity::coupon_code,
  prelude::*,
  state::AppState,
  sv::coupon::{CouponFilter, CouponQuote, GenerateCoupons, NewCoupon},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct CodeReq {
  pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RedeemReq {
  pub code: String,
  #[serde(default)]
  pub contact: Option<String>,
}

pub async fn list(
  State(app): State<Arc<AppState>>,
  _: Admin,
  Query(filter): Query<CouponFilter>,
) -> Result<Json<Vec<coupon_code::Model>>> {
  Ok(Json(app.sv().coupon.list(filter).await?))
}

pub async fn create(
  State(app): State<Arc<AppState>>,
  _: Admin,
  Json(req): Json<NewCoupon>,
) -> Result<(StatusCode, Json<coupon_code::Model>)> {
  let coupon = app.sv().coupon.create(req).await?;
  Ok((StatusCode::CREATED, Json(coupon)))
}

pub async fn generate(
  State(app): State<Arc<AppState>>,
  _: Admin,
  Json(req): Json<GenerateCoupons>,
) -> Result<(StatusCode, Json<Vec<coupon_code::Model>>)> {
  let coupons = app.sv().coupon.generate(req).await?;
  Ok((StatusCode::CREATED, Json(coupons)))
}

pub async fn validate(
  State(app): State<Arc<AppState>>,
  Json(req): Json<CodeReq>,
) -> Result<Json<CouponQuote>> {
  Ok(Json(app.sv().coupon.validate(&req.code).await?))
}

pub async fn redeem(
  State(app): State<Arc<AppState>>,
  Json(req): Json<RedeemReq>,
) -> Result<Json<coupon_code::Model>> {
  Ok(Json(app.sv().coupon.redeem(&req.code, req.contact).await?))
}
