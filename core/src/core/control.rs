// storefront/core/src/core/control.rs

//! Signals for controlling pipeline flow and the outcome of a pipeline run.

/// Returned by a handler to tell the pipeline whether to keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// Halt the pipeline. No further handlers run, in this step or later ones.
  Stop,
}

/// Outcome of a full pipeline execution that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  Completed,
  /// A handler returned `PipelineControl::Stop`.
  Stopped,
}
