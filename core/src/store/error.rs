// storefront/core/src/store/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
  /// The backend could not be reached or the operation failed in transit.
  #[error("Store unavailable. Source: {source}")]
  Unavailable {
    #[source]
    source: AnyhowError,
  },

  #[error("Conflict: {0}")]
  Conflict(String),

  /// A stored record violates a domain invariant (e.g. negative stock).
  #[error("Corrupt record: {0}")]
  Corrupt(String),
}

impl StoreError {
  pub fn unavailable(source: impl Into<AnyhowError>) -> Self {
    StoreError::Unavailable { source: source.into() }
  }

  /// Whether retrying the same operation later can succeed.
  pub fn is_transient(&self) -> bool {
    matches!(self, StoreError::Unavailable { .. })
  }
}

pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;
