use std::sync::Arc;

use async_trait::async_trait;

use crate::{prelude::*, state::AppState};

const SESSION_GC_INTERVAL: Duration = Duration::from_secs(60);

/// Periodic housekeeping: evicts expired admin sessions.
pub struct Plugin;

#[async_trait]
impl super::Plugin for Plugin {
  fn name(&self) -> &'static str {
    "cron"
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(SESSION_GC_INTERVAL);
    loop {
      interval.tick().await;
      let evicted = app.gc_sessions();
      if evicted > 0 {
        debug!("Evicted {evicted} expired sessions");
      }
    }
  }
}
