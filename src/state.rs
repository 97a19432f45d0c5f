use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::Config, prelude::*, sv};

/// An authenticated admin session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
  pub token: String,
  pub email: String,
  pub issued_at: DateTime,
  pub expires_at: DateTime,
}

pub type Sessions = DashMap<String, Session>;

pub struct Services<'a> {
  pub offer: sv::Offer<'a>,
  pub coupon: sv::Coupon<'a>,
  pub settings: sv::Settings<'a>,
  pub uploads: sv::Uploads<'a>,
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub config: Config,
  pub sessions: Sessions,
}

/// Opens the database and brings the schema up to date.
pub async fn connect(db_url: &str) -> anyhow::Result<DatabaseConnection> {
  info!("Connecting to database...");
  let db = Database::connect(db_url)
    .await
    .with_context(|| format!("Failed to connect to `{db_url}`"))?;

  info!("Running migrations...");
  Migrator::up(&db, None).await.context("Failed to run migrations")?;

  Ok(db)
}

/// Byte comparison whose timing depends only on the lengths, not the contents.
fn constant_eq(a: &[u8], b: &[u8]) -> bool {
  a.len() == b.len()
    && a.iter().zip(b).fold(0, |acc, (x, y)| acc | (x ^ y)) == 0
}

impl AppState {
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    let db = connect(&config.database_url).await?;
    Ok(Self::with_db(db, config))
  }

  pub fn with_db(db: DatabaseConnection, config: Config) -> Self {
    Self { db, config, sessions: DashMap::new() }
  }

  pub fn sv(&self) -> Services<'_> {
    Services {
      offer: sv::Offer::new(&self.db),
      coupon: sv::Coupon::new(&self.db),
      settings: sv::Settings::new(&self.db),
      uploads: sv::Uploads::new(&self.config),
    }
  }

  fn session_lifetime(&self) -> TimeDelta {
    TimeDelta::from_std(self.config.session_lifetime)
      .unwrap_or_else(|_| TimeDelta::days(365))
  }

  pub fn login(&self, email: &str, password: &str) -> Result<Session> {
    let admin = &self.config;
    if admin.admin_password.is_empty()
      || !email.trim().eq_ignore_ascii_case(admin.admin_email.trim())
      || !constant_eq(password.as_bytes(), admin.admin_password.as_bytes())
    {
      warn!("Rejected login attempt for `{}`", email.trim());
      return Err(Error::Unauthorized);
    }

    let now = utils::now();
    let session = Session {
      token: Uuid::new_v4().simple().to_string(),
      email: admin.admin_email.clone(),
      issued_at: now,
      expires_at: now + self.session_lifetime(),
    };

    self.sessions.insert(session.token.clone(), session.clone());
    info!("Admin `{}` logged in", session.email);

    Ok(session)
  }

  /// Looks up a live session and slides its expiration forward.
  pub fn authorize(&self, token: &str) -> Option<Session> {
    let now = utils::now();
    let mut session = self.sessions.get_mut(token)?;

    if session.expires_at < now {
      drop(session);
      self.sessions.remove(token);
      return None;
    }

    session.expires_at = now + self.session_lifetime();
    Some(session.clone())
  }

  pub fn logout(&self, token: &str) -> bool {
    self.sessions.remove(token).is_some()
  }

  /// Drops expired sessions, returning how many were removed.
  pub fn gc_sessions(&self) -> usize {
    let now = utils::now();
    let before = self.sessions.len();
    self.sessions.retain(|_token, session| session.expires_at >= now);
    before - self.sessions.len()
  }
}
