// storefront/server/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use storefront::FallbackStore;
use storefront_server::db::{self, PgStore};
use storefront_server::services::{catalog_loader, reconcile_service};
use storefront_server::{web, AppConfig, AppState, Stores};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting storefront server...");

  let app_config = Arc::new(AppConfig::from_env().context("Failed to load application configuration")?);

  // Lazy: the server must come up, and take orders via the fallback store,
  // even when the database is unreachable.
  let db_pool = db::connect_lazy(&app_config).context("Invalid database configuration")?;

  let fallback = Arc::new(FallbackStore::new(app_config.fallback_order_capacity));
  if let Some(path) = &app_config.fallback_catalog_path {
    catalog_loader::seed_fallback_catalog(&fallback, path)
      .await
      .with_context(|| format!("Failed to load the fallback catalog from {}", path.display()))?;
  }
  tracing::info!(capacity = fallback.capacity(), "Fallback store ready.");

  let app_state = AppState::new(app_config.clone(), Stores::from_backend(PgStore::new(db_pool)), fallback);

  let _reconciler = app_config
    .reconcile_interval
    .map(|every| reconcile_service::spawn_reconciliation(app_state.placement.clone(), every));

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await?;

  Ok(())
}
