// storefront/server/src/db/mod.rs

//! Postgres implementations of the store capabilities.
//!
//! Every query uses runtime `sqlx::query_as` against the tables in
//! `schema.sql`. Constraint violations surface as `StoreError::Conflict`;
//! every other failure is `StoreError::Unavailable`, which the placement
//! workflow treats as a degraded durable store.

pub mod catalog;
pub mod identity;
pub mod ledger;
mod rows;

use crate::config::AppConfig;
use sqlx::postgres::{PgPool, PgPoolOptions};
use storefront::StoreError;

/// Adapter over one connection pool. Implements `CatalogStore`,
/// `IdentityStore` and `OrderLedger`.
#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }
}

/// Opens the pool without connecting, so the server starts (and serves
/// orders through the fallback store) while the database is down.
pub fn connect_lazy(config: &AppConfig) -> Result<PgPool, sqlx::Error> {
  PgPoolOptions::new()
    .acquire_timeout(config.db_acquire_timeout)
    .connect_lazy(&config.database_url)
}

pub(crate) fn store_err(err: sqlx::Error) -> StoreError {
  if let sqlx::Error::Database(db_err) = &err {
    if db_err.is_unique_violation() || db_err.is_foreign_key_violation() || db_err.is_check_violation() {
      return StoreError::Conflict(db_err.message().to_string());
    }
  }
  StoreError::unavailable(err)
}
