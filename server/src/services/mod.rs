// storefront/server/src/services/mod.rs

pub mod auth_service;
pub mod catalog_loader;
pub mod reconcile_service;
pub mod session_service;
