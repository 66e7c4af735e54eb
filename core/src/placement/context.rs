// storefront/core/src/placement/context.rs

//! State threaded through the PlaceOrder pipeline.

use crate::model::{Order, Product, User};
use crate::placement::error::PlacementError;
use crate::placement::request::{PlaceOrderRequest, ValidatedOrder};
use crate::store::{CatalogStore, FallbackStore, IdentityStore, OrderLedger};
use rust_decimal::Decimal;
use std::sync::Arc;

/// The stores a placement touches. Cloning shares the same stores.
#[derive(Clone)]
pub struct PlacementStores {
  pub catalog: Arc<dyn CatalogStore>,
  pub identity: Arc<dyn IdentityStore>,
  pub ledger: Arc<dyn OrderLedger>,
  pub fallback: Arc<FallbackStore>,
}

/// Which catalog a product was resolved from. Stock is reserved against the
/// same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSource {
  Durable,
  Fallback,
}

#[derive(Debug, Clone)]
pub struct ResolvedProduct {
  pub product: Product,
  pub source: ProductSource,
}

/// The created order, tagged with the path that recorded it.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
  /// Written to the durable Order Ledger.
  Durable(Order),
  /// The ledger write failed; held in the process-local fallback store.
  Fallback(Order),
}

impl Placement {
  pub fn order(&self) -> &Order {
    match self {
      Placement::Durable(order) | Placement::Fallback(order) => order,
    }
  }

  pub fn into_order(self) -> Order {
    match self {
      Placement::Durable(order) | Placement::Fallback(order) => order,
    }
  }

  pub fn is_fallback(&self) -> bool {
    matches!(self, Placement::Fallback(_))
  }
}

#[derive(Clone)]
pub struct PlacementCtxData {
  pub stores: PlacementStores,
  pub request: PlaceOrderRequest,
  pub validated: Option<ValidatedOrder>,
  pub buyer: Option<User>,
  pub product: Option<ResolvedProduct>,
  pub total_amount: Option<Decimal>,
  pub reserved: bool,
  pub placement: Option<Placement>,
}

impl PlacementCtxData {
  pub fn new(stores: PlacementStores, request: PlaceOrderRequest) -> Self {
    Self {
      stores,
      request,
      validated: None,
      buyer: None,
      product: None,
      total_amount: None,
      reserved: false,
      placement: None,
    }
  }

  pub(crate) fn validated(&self) -> Result<&ValidatedOrder, PlacementError> {
    self
      .validated
      .as_ref()
      .ok_or_else(|| PlacementError::Internal("order request was not validated before use".to_string()))
  }

  pub(crate) fn resolved_product(&self) -> Result<&ResolvedProduct, PlacementError> {
    self
      .product
      .as_ref()
      .ok_or_else(|| PlacementError::Internal("product was not resolved before use".to_string()))
  }

  pub(crate) fn total(&self) -> Result<Decimal, PlacementError> {
    self
      .total_amount
      .ok_or_else(|| PlacementError::Internal("order total was not computed before use".to_string()))
  }
}
