// storefront/server/src/services/catalog_loader.rs

//! Seeds the fallback catalog from a JSON file of products.

use crate::errors::AppError;
use std::path::Path;
use storefront::model::Product;
use storefront::FallbackStore;
use tracing::{info, instrument};

/// Reads `path` as a JSON array of products and checks each against the
/// catalog invariants. Any bad record rejects the whole file.
#[instrument(name = "catalog_loader::load", skip_all, fields(path = %path.display()))]
pub async fn load_fallback_catalog(path: &Path) -> Result<Vec<Product>, AppError> {
  let raw = tokio::fs::read_to_string(path)
    .await
    .map_err(|e| AppError::Config(format!("Cannot read fallback catalog {}: {}", path.display(), e)))?;
  parse_fallback_catalog(&raw)
}

pub fn parse_fallback_catalog(raw: &str) -> Result<Vec<Product>, AppError> {
  let products: Vec<Product> =
    serde_json::from_str(raw).map_err(|e| AppError::Config(format!("Invalid fallback catalog: {}", e)))?;
  for product in &products {
    product
      .check_invariants()
      .map_err(|reason| AppError::Config(format!("Invalid fallback catalog: {}", reason)))?;
  }
  Ok(products)
}

/// Loads the file and seeds `fallback` with it.
pub async fn seed_fallback_catalog(fallback: &FallbackStore, path: &Path) -> Result<usize, AppError> {
  let products = load_fallback_catalog(path).await?;
  let seeded = fallback.seed_products(products);
  info!(seeded, "Fallback catalog seeded.");
  Ok(seeded)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_accepts_valid_products() {
    let raw = r#"[{
      "id": "6f1c1f0e-2a53-4a55-9d1e-2f4b0d9c6a11",
      "name": "Mug",
      "description": "Stoneware mug",
      "price": 4.5,
      "stock": 12,
      "category": "Kitchen",
      "createdAt": "2024-01-01T00:00:00Z",
      "updatedAt": "2024-01-01T00:00:00Z"
    }]"#;
    let products = parse_fallback_catalog(raw).unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].stock, 12);
  }

  #[test]
  fn test_parse_rejects_non_positive_price() {
    let raw = r#"[{
      "id": "6f1c1f0e-2a53-4a55-9d1e-2f4b0d9c6a11",
      "name": "Mug",
      "description": "Stoneware mug",
      "price": 0,
      "stock": 12,
      "createdAt": "2024-01-01T00:00:00Z",
      "updatedAt": "2024-01-01T00:00:00Z"
    }]"#;
    assert!(matches!(parse_fallback_catalog(raw), Err(AppError::Config(_))));
  }
}
