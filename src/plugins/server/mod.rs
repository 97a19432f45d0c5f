mod auth;
mod coupons;
mod offers;
mod settings;
mod uploads;

use std::{net::SocketAddr, sync::Arc};

use async_trait::async_trait;
use axum::{
  Json, Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
  catch_panic::CatchPanicLayer,
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

pub use self::auth::Admin;
use crate::{prelude::*, state::AppState};

/// Multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub async fn health() -> Json<json::Value> {
  Json(json::json!({ "status": "ok" }))
}

/// All routes without rate limiting, so it can be driven without a socket.
pub fn router(app: Arc<AppState>) -> Router {
  let upload_limit = app.config.max_upload_size + MULTIPART_OVERHEAD;

  Router::new()
    .route("/health", get(health))
    .route("/api/auth/login", post(auth::login))
    .route("/api/auth/logout", post(auth::logout))
    .route("/api/auth/me", get(auth::me))
    .route("/api/discount-offers", get(offers::list).post(offers::create))
    .route("/api/discount-offers/{id}", get(offers::show).put(offers::update))
    .route("/api/coupons", get(coupons::list).post(coupons::create))
    .route("/api/coupons/generate", post(coupons::generate))
    .route("/api/coupons/validate", post(coupons::validate))
    .route("/api/coupons/redeem", post(coupons::redeem))
    .route("/api/settings", get(settings::show).put(settings::update))
    .route(
      "/api/uploads",
      post(uploads::upload).layer(DefaultBodyLimit::max(upload_limit)),
    )
    .route("/uploads/{name}", get(uploads::serve))
    .layer(
      ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .layer(
          CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        ),
    )
    .with_state(app)
}

pub struct Plugin;

#[async_trait]
impl super::Plugin for Plugin {
  fn name(&self) -> &'static str {
    "http"
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let governor_conf = Arc::new(
      GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(100)
        .finish()
        .context("Failed to build rate limiter config")?,
    );

    let limiter = governor_conf.limiter().clone();

    let port = app.config.port;
    let router = router(app)
      .layer(GovernorLayer::new(governor_conf))
      .into_make_service_with_connect_info::<SocketAddr>();

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
      .await
      .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP Server listening on {addr}");

    let limiter = async {
      loop {
        tokio::time::sleep(Duration::from_secs(60)).await;
        limiter.retain_recent();
      }
    };

    let server = async {
      axum::serve(listener, router).await.context("Axum server error")
    };

    tokio::select! {
      result = server => {
        match &result {
          Ok(_) => info!("Server stopped gracefully"),
          Err(err) => error!("Server stopped with error: {err}"),
        }
        result
      }
      _ = limiter => {
        error!("Rate limiter cleaner stopped unexpectedly!");
        Ok(())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
  };
  use json::{Value, json};
  use tower::ServiceExt;

  use super::*;
  use crate::{
    config::Config,
    state::tests::{config, setup_test_app},
  };

  async fn call(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
      req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
      Some(body) => req
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string())),
      None => req.body(Body::empty()),
    }
    .unwrap();

    let res = router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, json::from_slice(&bytes).unwrap_or(Value::Null))
  }

  async fn setup(config: Config) -> (Router, String) {
    let app = Arc::new(setup_test_app(config).await);
    let router = router(app);

    let (status, session) = call(
      &router,
      "POST",
      "/api/auth/login",
      None,
      Some(json!({ "email": "admin@shop.test", "password": "hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = session["token"].as_str().unwrap().to_string();
    (router, token)
  }

  #[tokio::test]
  async fn health_is_static() {
    let (router, _) = setup(config()).await;

    let (status, body) = call(&router, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
  }

  #[tokio::test]
  async fn admin_routes_need_a_session() {
    let (router, token) = setup(config()).await;

    for (method, uri) in [
      ("GET", "/api/settings"),
      ("GET", "/api/coupons"),
      ("POST", "/api/auth/logout"),
    ] {
      let (status, body) = call(&router, method, uri, None, None).await;
      assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
      assert_eq!(body["kind"], "unauthorized");

      let (status, _) =
        call(&router, method, uri, Some("not-a-token"), None).await;
      assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
    }

    let (status, me) =
      call(&router, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "admin@shop.test");

    call(&router, "POST", "/api/auth/logout", Some(&token), None).await;
    let (status, _) =
      call(&router, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn bad_login_is_unauthorized() {
    let (router, _) = setup(config()).await;

    let (status, body) = call(
      &router,
      "POST",
      "/api/auth/login",
      None,
      Some(json!({ "email": "admin@shop.test", "password": "guess" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
  }

  #[tokio::test]
  async fn coupon_lifecycle() {
    let (router, token) = setup(config()).await;
    let token = Some(token.as_str());

    let (status, offer) = call(
      &router,
      "POST",
      "/api/discount-offers",
      token,
      Some(json!({
        "name": "SUMMER",
        "discountPercentage": 20,
        "startDate": "2024-06-01",
        "endDate": "2099-08-31",
        "availableOn": "website",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(offer["availableOn"], "website");

    let (status, body) = call(
      &router,
      "POST",
      "/api/discount-offers",
      token,
      Some(json!({
        "name": "BROKEN",
        "discountPercentage": 20,
        "startDate": "2024-06-01",
        "endDate": "2024-06-01",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "validation");

    let (status, coupon) = call(
      &router,
      "POST",
      "/api/coupons",
      token,
      Some(json!({
        "code": " save10 ",
        "expirationDate": "2099-01-01T00:00:00Z",
        "discountOfferId": offer["id"],
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(coupon["code"], "SAVE10");
    assert_eq!(coupon["status"], "unused");

    let (status, quote) = call(
      &router,
      "POST",
      "/api/coupons/validate",
      None,
      Some(json!({ "code": "save10" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["discountPercentage"], 20.0);
    assert_eq!(quote["availableOn"], "website");

    let redeem = json!({ "code": "SAVE10", "contact": "c-1" });
    let (status, used) = call(
      &router,
      "POST",
      "/api/coupons/redeem",
      None,
      Some(redeem.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(used["status"], "used");

    let (status, body) =
      call(&router, "POST", "/api/coupons/redeem", None, Some(redeem)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "coupon_used");

    let uri = format!("/api/discount-offers/{}", offer["id"]);
    let (status, detail) = call(&router, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["name"], "SUMMER");
    assert_eq!(detail["coupons"][0]["code"], "SAVE10");

    let (status, listed) =
      call(&router, "GET", "/api/coupons?status=used", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn settings_roundtrip() {
    let (router, token) = setup(config()).await;
    let token = Some(token.as_str());

    let (status, settings) =
      call(&router, "GET", "/api/settings", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["automaticInvoicing"], true);

    let (status, settings) = call(
      &router,
      "PUT",
      "/api/settings",
      token,
      Some(json!({ "automaticInvoicing": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["automaticInvoicing"], false);
  }

  #[tokio::test]
  async fn upload_and_serve() {
    let dir = tempfile::tempdir().unwrap();
    let (router, token) = setup(Config {
      uploads_dir: dir.path().to_path_buf(),
      public_url: "http://shop.test".into(),
      ..config()
    })
    .await;

    let payload = b"GIF89a-not-really";
    let mut body = Vec::new();
    body.extend_from_slice(
      b"--XBOUNDARY\r\n\
        Content-Disposition: form-data; name=\"image\"; filename=\"a.gif\"\r\n\
        Content-Type: image/gif\r\n\r\n",
    );
    body.extend_from_slice(payload);
    body.extend_from_slice(b"\r\n--XBOUNDARY--\r\n");

    let req = Request::builder()
      .method("POST")
      .uri("/api/uploads")
      .header(header::AUTHORIZATION, format!("Bearer {token}"))
      .header(
        header::CONTENT_TYPE,
        "multipart/form-data; boundary=XBOUNDARY",
      )
      .body(Body::from(body))
      .unwrap();

    let res = router.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let upload: Value = json::from_slice(&bytes).unwrap();

    let name = upload["name"].as_str().unwrap();
    assert!(name.ends_with(".gif"));
    assert_eq!(upload["url"], format!("http://shop.test/uploads/{name}"));

    let req = Request::builder()
      .uri(format!("/uploads/{name}"))
      .body(Body::empty())
      .unwrap();
    let res = router.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "image/gif");
    let served = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&served[..], payload);

    let (status, _) =
      call(&router, "GET", "/uploads/missing.png", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
