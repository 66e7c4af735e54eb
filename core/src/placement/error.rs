// storefront/core/src/placement/error.rs
use crate::error::PipelineError;
use crate::store::StoreError;
use thiserror::Error;

/// Why a PlaceOrder or ListOrdersForUser call failed.
///
/// Variants are listed in precedence order: validation first, then lookups,
/// then business rules, then write failures.
#[derive(Debug, Error)]
pub enum PlacementError {
  #[error("All fields are required ({field} is missing)")]
  MissingField { field: &'static str },

  #[error("Invalid {what}")]
  InvalidIdentifier { what: &'static str },

  #[error("Quantity must be a positive number")]
  InvalidQuantity,

  #[error("User not found")]
  UserNotFound,

  #[error("Product not found")]
  ProductNotFound { id_requested: String },

  #[error("Insufficient stock")]
  InsufficientStock { available: u32 },

  /// The stock decrement could not be confirmed. Never downgraded to a
  /// fallback: an unrecorded decrement risks overselling.
  #[error("Server error while updating stock")]
  StockUpdateFailed {
    #[source]
    source: StoreError,
  },

  #[error("Internal placement error: {0}")]
  Internal(String),
}

impl PlacementError {
  /// Validation failures are resolved before any store is touched.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      PlacementError::MissingField { .. } | PlacementError::InvalidIdentifier { .. } | PlacementError::InvalidQuantity
    )
  }
}

impl From<PipelineError> for PlacementError {
  fn from(err: PipelineError) -> Self {
    PlacementError::Internal(err.to_string())
  }
}
