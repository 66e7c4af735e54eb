// storefront/core/src/error.rs
use thiserror::Error;

/// Errors raised by the pipeline engine and the workflow registry itself,
/// as opposed to errors returned by step handlers.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("No workflow registered for context type {type_name}")]
  WorkflowNotRegistered { type_name: String },

  #[error("Context type mismatch (expected {expected_type})")]
  TypeMismatch { expected_type: String },
}
