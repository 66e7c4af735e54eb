// storefront/server/src/pipelines/mod.rs

//! Defines and registers the pipelines the HTTP layer dispatches through the
//! `Workflows` registry.

use crate::errors::AppError;
use storefront::Workflows;

pub mod contexts;
pub mod signin_pipeline;
pub mod signup_pipeline;

/// Registers every request workflow. Called once while building `AppState`.
pub fn register_all_pipelines(workflows: &Workflows<AppError>) {
  signup_pipeline::register_signup_pipeline(workflows);
  signin_pipeline::register_signin_pipeline(workflows);
  tracing::info!("All application pipelines registered.");
}
