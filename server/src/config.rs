// storefront/server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  /// How long a request waits for a pooled connection before the store
  /// counts as unavailable.
  pub db_acquire_timeout: Duration,

  /// Upper bound on orders held in the fallback store.
  pub fallback_order_capacity: usize,
  /// JSON array of products to seed the fallback catalog with.
  pub fallback_catalog_path: Option<PathBuf>,
  /// `None` disables the background reconciliation task.
  pub reconcile_interval: Option<Duration>,

  pub session_ttl: Duration,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = parse_or("SERVER_PORT", 8080u16)?;
    let database_url = get_env("DATABASE_URL")?;
    let db_acquire_timeout = Duration::from_secs(parse_or("DB_ACQUIRE_TIMEOUT_SECS", 5u64)?);

    let fallback_order_capacity = parse_or("FALLBACK_ORDER_CAPACITY", 10_000usize)?;
    if fallback_order_capacity == 0 {
      return Err(AppError::Config("FALLBACK_ORDER_CAPACITY must be at least 1".to_string()));
    }
    let fallback_catalog_path = get_env("FALLBACK_CATALOG_PATH")
      .ok()
      .filter(|p| !p.trim().is_empty())
      .map(PathBuf::from);

    let reconcile_secs = parse_or("RECONCILE_INTERVAL_SECS", 60u64)?;
    let reconcile_interval = (reconcile_secs > 0).then(|| Duration::from_secs(reconcile_secs));

    let session_ttl = Duration::from_secs(parse_or("SESSION_TTL_SECS", 3600u64)?);

    tracing::info!(
      %server_host,
      server_port,
      fallback_order_capacity,
      reconcile_secs,
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      db_acquire_timeout,
      fallback_order_capacity,
      fallback_catalog_path,
      reconcile_interval,
      session_ttl,
    })
  }

  /// Defaults for everything except the database, which tests replace with
  /// in-memory stores.
  pub fn for_tests() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 0,
      database_url: String::new(),
      db_acquire_timeout: Duration::from_secs(1),
      fallback_order_capacity: 100,
      fallback_catalog_path: None,
      reconcile_interval: None,
      session_ttl: Duration::from_secs(3600),
    }
  }
}

fn parse_or<T>(var_name: &str, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match env::var(var_name) {
    Ok(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {}: {}", var_name, e))),
    Err(_) => Ok(default),
  }
}
