use std::sync::Arc;

use axum::{Json, extract::State};

use super::Admin;
use crate::{
  entity::settings, prelude::*, state::AppState, sv::settings::SettingsPatch,
};

pub async fn show(
  State(app): State<Arc<AppState>>,
  _: Admin,
) -> Result<Json<settings::Model>> {
  Ok(Json(app.sv().settings.get().await?))
}

pub async fn update(
  State(app): State<Arc<AppState>>,
  _: Admin,
  Json(patch): Json<SettingsPatch>,
) -> Result<Json<settings::Model>> {
  Ok(Json(app.sv().settings.update(patch).await?))
}
