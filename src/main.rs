use std::sync::Arc;

use shop_admin::{config::Config, plugins, prelude::*, state::AppState};
use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "shop_admin=debug,tower_http=debug,axum=trace,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  info!("Starting Shop Admin v{}", env!("CARGO_PKG_VERSION"));

  let config = Config::from_env().context("Invalid configuration")?;
  let app = Arc::new(AppState::new(config).await?);

  let services = plugins::App::new()
    .register(plugins::server::Plugin)
    .register(plugins::cron::Plugin)
    .run(app);

  tokio::signal::ctrl_c().await.context("Failed to listen for shutdown")?;
  info!("Shutting down");

  for service in services {
    service.abort();
  }

  Ok(())
}
