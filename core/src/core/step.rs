// storefront/core/src/core/step.rs

/// A named step in a pipeline.
///
/// An optional step without handlers is skipped; a required one without
/// handlers fails the run with `PipelineError::HandlerMissing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDef {
  pub name: String,
  pub optional: bool,
}

impl StepDef {
  pub fn new(name: impl Into<String>, optional: bool) -> Self {
    Self {
      name: name.into(),
      optional,
    }
  }
}
