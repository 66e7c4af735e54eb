// storefront/core/src/placement/request.rs

//! The raw PlaceOrder input and its validation.

use crate::model::parse_id;
use crate::placement::error::PlacementError;
use serde::de::IgnoredAny;
use serde::Deserialize;
use uuid::Uuid;

/// A quantity exactly as the caller sent it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawQuantity {
  Integer(i64),
  Number(f64),
  Text(String),
  Other(IgnoredAny),
}

impl RawQuantity {
  /// A positive whole number that fits in `u32`. Integral floats (`3.0`) are
  /// accepted; strings never are.
  fn to_positive(&self) -> Option<u32> {
    match self {
      RawQuantity::Integer(n) if *n > 0 => u32::try_from(*n).ok(),
      RawQuantity::Number(f) if *f > 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64 => Some(*f as u32),
      _ => None,
    }
  }
}

impl From<u32> for RawQuantity {
  fn from(n: u32) -> Self {
    RawQuantity::Integer(i64::from(n))
  }
}

/// PlaceOrder input before validation. Every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
  pub user_id: Option<String>,
  pub product_id: Option<String>,
  pub quantity: Option<RawQuantity>,
  pub address: Option<String>,
}

impl PlaceOrderRequest {
  pub fn new(user_id: impl Into<String>, product_id: impl Into<String>, quantity: u32, address: impl Into<String>) -> Self {
    Self {
      user_id: Some(user_id.into()),
      product_id: Some(product_id.into()),
      quantity: Some(RawQuantity::from(quantity)),
      address: Some(address.into()),
    }
  }

  /// Presence of all four fields first, then identifier shape, then quantity.
  /// Blank strings count as absent.
  pub fn validate(&self) -> Result<ValidatedOrder, PlacementError> {
    let present = |s: &Option<String>| s.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

    let user_id = present(&self.user_id);
    let product_id = present(&self.product_id);
    let address = present(&self.address);

    let (user_id, product_id, quantity, address) = match (user_id, product_id, &self.quantity, address) {
      (None, ..) => return Err(PlacementError::MissingField { field: "userId" }),
      (_, None, ..) => return Err(PlacementError::MissingField { field: "productId" }),
      (_, _, None, _) => return Err(PlacementError::MissingField { field: "quantity" }),
      (_, _, _, None) => return Err(PlacementError::MissingField { field: "address" }),
      (Some(u), Some(p), Some(q), Some(a)) => (u, p, q, a),
    };

    let user_id = parse_id(&user_id).ok_or(PlacementError::InvalidIdentifier { what: "user ID" })?;
    let product_id = parse_id(&product_id).ok_or(PlacementError::InvalidIdentifier { what: "product ID" })?;
    let quantity = quantity.to_positive().ok_or(PlacementError::InvalidQuantity)?;

    Ok(ValidatedOrder {
      user_id,
      product_id,
      quantity,
      address,
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder {
  pub user_id: Uuid,
  pub product_id: Uuid,
  pub quantity: u32,
  pub address: String,
}
