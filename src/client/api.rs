//! Typed HTTP client for the admin server.

use reqwest::{RequestBuilder, multipart};
use serde::de::DeserializeOwned;

use crate::{
  entity::{coupon_code, discount_offer, settings},
  state::Session,
  sv::{
    coupon::{CouponFilter, CouponQuote, GenerateCoupons, NewCoupon},
    offer::{NewOffer, OfferDetail, OfferFilter, OfferPatch},
    settings::SettingsPatch,
    uploads::Upload,
  },
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error(transparent)]
  Http(#[from] reqwest::Error),

  /// The server answered with an error body
  #[error("{message}")]
  Api { status: u16, kind: String, message: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub struct Api {
  http: reqwest::Client,
  base: String,
  token: Option<String>,
}

impl Api {
  pub fn new(base: impl Into<String>) -> Self {
    let base = base.into().trim_end_matches('/').to_string();
    Self { http: reqwest::Client::new(), base, token: None }
  }

  pub fn token(&self) -> Option<&str> {
    self.token.as_deref()
  }

  pub fn set_token(&mut self, token: Option<String>) {
    self.token = token;
  }

  fn url(&self, path: &str) -> String {
    format!("{}{path}", self.base)
  }

  fn get(&self, path: &str) -> RequestBuilder {
    self.authed(self.http.get(self.url(path)))
  }

  fn post(&self, path: &str) -> RequestBuilder {
    self.authed(self.http.post(self.url(path)))
  }

  fn put(&self, path: &str) -> RequestBuilder {
    self.authed(self.http.put(self.url(path)))
  }

  fn authed(&self, req: RequestBuilder) -> RequestBuilder {
    match &self.token {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }

  async fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T> {
    let res = req.send().await?;
    let status = res.status();

    if status.is_success() {
      return Ok(res.json().await?);
    }

    let body: json::Value = res.json().await.unwrap_or_default();
    let field = |name: &str| body.get(name).and_then(|v| v.as_str());

    Err(Error::Api {
      status: status.as_u16(),
      kind: field("kind").unwrap_or("unknown").to_string(),
      message: field("error")
        .or(status.canonical_reason())
        .unwrap_or("Request failed")
        .to_string(),
    })
  }

  pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
    let body = json::json!({ "email": email, "password": password });
    Self::send(self.post("/api/auth/login").json(&body)).await
  }

  pub async fn logout(&self) -> Result<()> {
    let _: json::Value = Self::send(self.post("/api/auth/logout")).await?;
    Ok(())
  }

  pub async fn offers(
    &self,
    filter: &OfferFilter,
  ) -> Result<Vec<discount_offer::Model>> {
    Self::send(self.get("/api/discount-offers").query(filter)).await
  }

  pub async fn offer(&self, id: i32) -> Result<OfferDetail> {
    Self::send(self.get(&format!("/api/discount-offers/{id}"))).await
  }

  pub async fn create_offer(
    &self,
    new: &NewOffer,
  ) -> Result<discount_offer::Model> {
    Self::send(self.post("/api/discount-offers").json(new)).await
  }

  pub async fn update_offer(
    &self,
    id: i32,
    patch: &OfferPatch,
  ) -> Result<discount_offer::Model> {
    Self::send(self.put(&format!("/api/discount-offers/{id}")).json(patch))
      .await
  }

  pub async fn coupons(
    &self,
    filter: &CouponFilter,
  ) -> Result<Vec<coupon_code::Model>> {
    Self::send(self.get("/api/coupons").query(filter)).await
  }

  pub async fn create_coupon(
    &self,
    new: &NewCoupon,
  ) -> Result<coupon_code::Model> {
    Self::send(self.post("/api/coupons").json(new)).await
  }

  pub async fn generate_coupons(
    &self,
    req: &GenerateCoupons,
  ) -> Result<Vec<coupon_code::Model>> {
    Self::send(self.post("/api/coupons/generate").json(req)).await
  }

  pub async fn validate_coupon(&self, code: &str) -> Result<CouponQuote> {
    let body = json::json!({ "code": code });
    Self::send(self.post("/api/coupons/validate").json(&body)).await
  }

  pub async fn redeem_coupon(
    &self,
    code: &str,
    contact: Option<&str>,
  ) -> Result<coupon_code::Model> {
    let body = json::json!({ "code": code, "contact": contact });
    Self::send(self.post("/api/coupons/redeem").json(&body)).await
  }

  pub async fn settings(&self) -> Result<settings::Model> {
    Self::send(self.get("/api/settings")).await
  }

  pub async fn update_settings(
    &self,
    patch: &SettingsPatch,
  ) -> Result<settings::Model> {
    Self::send(self.put("/api/settings").json(patch)).await
  }

  pub async fn upload(
    &self,
    file_name: &str,
    content_type: &str,
    bytes: Vec<u8>,
  ) -> Result<Upload> {
    let part = multipart::Part::bytes(bytes)
      .file_name(file_name.to_string())
      .mime_str(content_type)?;
    let form = multipart::Form::new().part("image", part);

    Self::send(self.post("/api/uploads").multipart(form)).await
  }
}
