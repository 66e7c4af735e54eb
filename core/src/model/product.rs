// storefront/core/src/model/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
  #[default]
  Active,
  Inactive,
}

impl ProductStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      ProductStatus::Active => "active",
      ProductStatus::Inactive => "inactive",
    }
  }
}

impl fmt::Display for ProductStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ProductStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "active" => Ok(ProductStatus::Active),
      "inactive" => Ok(ProductStatus::Inactive),
      other => Err(format!("unknown product status '{}'", other)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub price: Decimal,
  /// Units on hand. Unsigned, so it can never be negative.
  pub stock: u32,
  #[serde(default)]
  pub category: Option<String>,
  #[serde(default, rename = "image_url")]
  pub image_url: Option<String>,
  #[serde(default)]
  pub status: ProductStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  /// Checks the catalog invariants: non-empty name and description, price > 0.
  pub fn check_invariants(&self) -> Result<(), String> {
    if self.name.trim().is_empty() {
      return Err(format!("product {} has an empty name", self.id));
    }
    if self.description.trim().is_empty() {
      return Err(format!("product {} has an empty description", self.id));
    }
    if self.price <= Decimal::ZERO {
      return Err(format!("product {} has a non-positive price ({})", self.id, self.price));
    }
    Ok(())
  }

  pub fn summary(&self) -> ProductSummary {
    ProductSummary {
      id: self.id,
      name: self.name.clone(),
      description: self.description.clone(),
      price: self.price,
      category: self.category.clone(),
      image_url: self.image_url.clone(),
    }
  }
}

/// The product fields embedded in an expanded order listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub price: Decimal,
  pub category: Option<String>,
  pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
  #[default]
  NameAsc,
  PriceAsc,
  PriceDesc,
}

impl ProductSort {
  /// `price_asc` / `price_desc`; anything else sorts by name.
  pub fn from_param(param: Option<&str>) -> Self {
    match param {
      Some("price_asc") => ProductSort::PriceAsc,
      Some("price_desc") => ProductSort::PriceDesc,
      _ => ProductSort::NameAsc,
    }
  }
}

/// Catalog listing criteria. Blank strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
  /// Case-insensitive exact category match.
  pub category: Option<String>,
  /// Case-insensitive substring match on name or description.
  pub query: Option<String>,
  pub sort: ProductSort,
}

impl ProductFilter {
  pub fn new(category: Option<&str>, query: Option<&str>, sort: Option<&str>) -> Self {
    let clean = |s: Option<&str>| s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
    Self {
      category: clean(category),
      query: clean(query),
      sort: ProductSort::from_param(sort),
    }
  }

  pub fn matches(&self, product: &Product) -> bool {
    if let Some(category) = &self.category {
      match &product.category {
        Some(c) if c.eq_ignore_ascii_case(category) => {}
        _ => return false,
      }
    }
    if let Some(query) = &self.query {
      let needle = query.to_lowercase();
      let hit = product.name.to_lowercase().contains(&needle) || product.description.to_lowercase().contains(&needle);
      if !hit {
        return false;
      }
    }
    true
  }

  /// Sorts `products` in place according to `self.sort`.
  pub fn sort(&self, products: &mut [Product]) {
    match self.sort {
      ProductSort::NameAsc => products.sort_by(|a, b| a.name.cmp(&b.name)),
      ProductSort::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price).then_with(|| a.name.cmp(&b.name))),
      ProductSort::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price).then_with(|| a.name.cmp(&b.name))),
    }
  }
}
