// storefront/server/src/lib.rs

//! HTTP surface of the storefront: auth, catalog and order routes over the
//! `storefront` placement workflow, with Postgres-backed stores.

pub mod config;
pub mod db;
pub mod errors;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod web;

pub use crate::config::AppConfig;
pub use crate::errors::{AppError, Result};
pub use crate::state::{AppState, Stores};
