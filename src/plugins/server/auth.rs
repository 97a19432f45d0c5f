use std::sync::Arc;

use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{header::AUTHORIZATION, request::Parts},
};
use serde::{Deserialize, Serialize};

use crate::{
  prelude::*,
  state::{AppState, Session},
};

/// Extractor guarding admin routes: a live bearer session.
#[derive(Debug, Clone)]
pub struct Admin(pub Session);

fn bearer(parts: &Parts) -> Option<&str> {
  let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
  let (scheme, token) = value.split_once(' ')?;
  scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
}

impl FromRequestParts<Arc<AppState>> for Admin {
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    app: &Arc<AppState>,
  ) -> Result<Self> {
    let token = bearer(parts).ok_or(Error::Unauthorized)?;
    app.authorize(token).map(Admin).ok_or(Error::Unauthorized)
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginReq {
  pub email: String,
  pub password: String,
}

pub async fn login(
  State(app): State<Arc<AppState>>,
  Json(req): Json<LoginReq>,
) -> Result<Json<Session>> {
  Ok(Json(app.login(&req.email, &req.password)?))
}

pub async fn logout(
  State(app): State<Arc<AppState>>,
  Admin(session): Admin,
) -> Json<json::Value> {
  app.logout(&session.token);
  info!("Admin `{}` logged out", session.email);
  Json(json::json!({ "success": true }))
}

pub async fn me(Admin(session): Admin) -> Json<Session> {
  Json(session)
}
