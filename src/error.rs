//! Error types for the admin server

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use tracing::error;

/// Why an existing coupon cannot be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CouponError {
  #[error("Coupon expired")]
  Expired,
  #[error("Coupon already used")]
  AlreadyUsed,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("Database error: {0}")]
  Database(#[from] DbErr),

  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  Conflict(String),

  #[error("{0} not found")]
  NotFound(&'static str),

  #[error(transparent)]
  Coupon(#[from] CouponError),

  #[error("Unauthorized")]
  Unauthorized,

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl Error {
  pub fn validation(message: impl Into<String>) -> Self {
    Self::Validation(message.into())
  }

  /// Maps a unique-constraint violation to [`Error::Conflict`].
  pub fn unique(err: DbErr, message: &str) -> Self {
    match err.sql_err() {
      Some(SqlErr::UniqueConstraintViolation(_)) => {
        Self::Conflict(message.to_string())
      }
      _ => Self::Database(err),
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      Error::Conflict(_) => StatusCode::CONFLICT,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::Coupon(CouponError::Expired) => StatusCode::GONE,
      Error::Coupon(CouponError::AlreadyUsed) => StatusCode::CONFLICT,
      Error::Unauthorized => StatusCode::UNAUTHORIZED,
      Error::Database(_) | Error::Io(_) | Error::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  pub fn kind(&self) -> &'static str {
    match self {
      Error::Validation(_) => "validation",
      Error::Conflict(_) => "conflict",
      Error::NotFound(_) => "not_found",
      Error::Coupon(CouponError::Expired) => "coupon_expired",
      Error::Coupon(CouponError::AlreadyUsed) => "coupon_used",
      Error::Unauthorized => "unauthorized",
      Error::Database(_) | Error::Io(_) | Error::Internal(_) => "internal",
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = if status.is_server_error() {
      error!("Request failed: {self}");
      "Internal error".to_string()
    } else {
      self.to_string()
    };

    let body = json::json!({
      "success": false,
      "kind": self.kind(),
      "error": message,
    });

    (status, Json(body)).into_response()
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
