use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};

use super::Admin;
use crate::{
  entity::discount_offer,
  prelude::*,
  state::AppState,
  sv::offer::{NewOffer, OfferDetail, OfferFilter, OfferPatch},
};

pub async fn list(
  State(app): State<Arc<AppState>>,
  Query(filter): Query<OfferFilter>,
) -> Result<Json<Vec<discount_offer::Model>>> {
  Ok(Json(app.sv().offer.list(filter).await?))
}

pub async fn show(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
) -> Result<Json<OfferDetail>> {
  Ok(Json(app.sv().offer.detail(id).await?))
}

pub async fn create(
  State(app): State<Arc<AppState>>,
  _: Admin,
  Json(req): Json<NewOffer>,
) -> Result<(StatusCode, Json<discount_offer::Model>)> {
  let offer = app.sv().offer.create(req).await?;
  Ok((StatusCode::CREATED, Json(offer)))
}

pub async fn update(
  State(app): State<Arc<AppState>>,
  _: Admin,
  Path(id): Path<i32>,
  Json(patch): Json<OfferPatch>,
) -> Result<Json<discount_offer::Model>> {
  Ok(Json(app.sv().offer.update(id, patch).await?))
}
