// storefront/server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use storefront::{PipelineError, PlacementError, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  /// No credentials were presented.
  #[error("Authentication Failed: {0}")]
  Auth(String),

  /// Credentials were presented but do not grant access.
  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Product not found: {id_requested}")]
  ProductNotFound { id_requested: String },

  #[error("Insufficient stock ({available} available)")]
  InsufficientStock { available: u32 },

  #[error("Stock update failed: {0}")]
  StockUpdate(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Store Error: {0}")]
  Store(#[from] StoreError),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: PipelineError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<PlacementError> for AppError {
  fn from(err: PlacementError) -> Self {
    match err {
      PlacementError::MissingField { .. } | PlacementError::InvalidIdentifier { .. } | PlacementError::InvalidQuantity => {
        AppError::Validation(err.to_string())
      }
      PlacementError::UserNotFound => AppError::NotFound("User not found".to_string()),
      PlacementError::ProductNotFound { id_requested } => AppError::ProductNotFound { id_requested },
      PlacementError::InsufficientStock { available } => AppError::InsufficientStock { available },
      PlacementError::StockUpdateFailed { source } => AppError::StockUpdate(source.to_string()),
      PlacementError::Internal(m) => AppError::Internal(m),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) | AppError::ProductNotFound { .. } => StatusCode::NOT_FOUND,
      AppError::StockUpdate(_)
      | AppError::Config(_)
      | AppError::Store(_)
      | AppError::Workflow { .. }
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  // Bodies carry a human-readable `error` and never internal details.
  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, "Responding with error");
    }

    let body = match self {
      AppError::Validation(m) | AppError::Auth(m) | AppError::Forbidden(m) | AppError::NotFound(m) => {
        json!({"error": m})
      }
      AppError::ProductNotFound { id_requested } => json!({"error": "Product not found", "idRequested": id_requested}),
      AppError::InsufficientStock { available } => json!({"error": "Insufficient stock", "availableStock": available}),
      AppError::StockUpdate(_) => json!({"error": "Server error while updating stock"}),
      AppError::Config(_) | AppError::Store(_) | AppError::Workflow { .. } | AppError::Internal(_) => {
        json!({"error": "Server error"})
      }
    };
    HttpResponse::build(status).json(body)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
