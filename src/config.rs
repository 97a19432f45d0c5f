//! Process configuration, read from the environment at startup.

use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use crate::prelude::*;

#[derive(Debug, Clone)]
pub struct Config {
  pub port: u16,
  pub database_url: String,
  pub admin_email: String,
  pub admin_password: String,
  /// Sliding lifetime of an admin session
  pub session_lifetime: Duration,
  pub uploads_dir: PathBuf,
  /// Base used to build links to uploaded files
  pub public_url: String,
  pub max_upload_size: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      port: 3000,
      database_url: String::from("sqlite:shop.db?mode=rwc"),
      admin_email: String::new(),
      admin_password: String::new(),
      session_lifetime: Duration::from_secs(12 * 3600),
      uploads_dir: PathBuf::from("./uploads"),
      public_url: String::from("http://localhost:3000"),
      max_upload_size: 5 * 1024 * 1024,
    }
  }
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    let defaults = Self::default();

    let port = parse_or("PORT", defaults.port)?;
    let session_lifetime =
      duration_or("SESSION_LIFETIME", defaults.session_lifetime)?;

    Ok(Self {
      port,
      database_url: env::var("DATABASE_URL")
        .unwrap_or(defaults.database_url),
      admin_email: required("ADMIN_EMAIL")?,
      admin_password: required("ADMIN_PASSWORD")?,
      session_lifetime,
      uploads_dir: env::var("UPLOADS_DIR")
        .map(PathBuf::from)
        .unwrap_or(defaults.uploads_dir),
      public_url: env::var("PUBLIC_URL")
        .unwrap_or_else(|_| format!("http://localhost:{port}")),
      max_upload_size: parse_or("MAX_UPLOAD_SIZE", defaults.max_upload_size)?,
    })
  }
}

fn required(key: &str) -> anyhow::Result<String> {
  env::var(key)
    .ok()
    .filter(|value| !value.trim().is_empty())
    .with_context(|| format!("{key} not set"))
}

fn duration_or(key: &str, default: Duration) -> anyhow::Result<Duration> {
  match env::var(key) {
    Ok(raw) => humantime::parse_duration(raw.trim())
      .with_context(|| format!("Invalid {key} `{raw}`")),
    Err(_) => Ok(default),
  }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
  T: FromStr + Display,
  T::Err: std::error::Error + Send + Sync + 'static,
{
  match env::var(key) {
    Ok(raw) => {
      raw.trim().parse().with_context(|| format!("Invalid {key} value `{raw}`"))
    }
    Err(_) => {
      debug!("{key} not set, using default: {default}");
      Ok(default)
    }
  }
}
