// storefront/core/src/pipeline/definition.rs

//! `Pipeline<TData, Err>` and the methods that shape its list of steps.

use crate::core::context::Handler;
use crate::core::step::StepDef;
use crate::error::PipelineError;
use std::collections::HashMap;

/// An ordered list of named steps, each with `before`, `on` and `after` hooks,
/// run against one shared `ContextData<TData>`.
///
/// `Err` is the error type handlers return. It must absorb `PipelineError` so
/// engine-level failures (a required step with no handlers) surface through
/// the same channel.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<StepDef>,
  pub(crate) before: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Creates a pipeline from `(step_name, optional)` pairs, in run order.
  pub fn new(step_defs: &[(&str, bool)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional)| StepDef::new(*name, *optional))
      .collect();

    Self {
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  /// Step names in run order.
  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  /// Panics if `step_name` is not part of the pipeline. Registering a hook on
  /// an unknown step is a wiring mistake, not a runtime condition.
  pub(crate) fn ensure_step_exists(&self, step_name: &str) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!("Pipeline setup error: Step '{}' not found in pipeline definition.", step_name);
    }
  }

  fn ensure_step_not_exists(&self, step_name: &str) {
    if self.steps.iter().any(|s| s.name == step_name) {
      panic!("Pipeline setup error: Step '{}' already exists in pipeline definition.", step_name);
    }
  }

  pub fn insert_after_step<S: Into<String>>(&mut self, existing_step_name: &str, new_step_name: S, optional: bool) {
    let name: String = new_step_name.into();
    self.ensure_step_not_exists(&name);
    let idx = match self.steps.iter().position(|s| s.name == existing_step_name) {
      Some(idx) => idx,
      None => panic!(
        "Pipeline setup error: Step '{}' not found in pipeline definition.",
        existing_step_name
      ),
    };
    self.steps.insert(idx + 1, StepDef::new(name, optional));
  }

  pub fn remove_step(&mut self, step_name: &str) {
    if let Some(idx) = self.steps.iter().position(|s| s.name == step_name) {
      self.steps.remove(idx);
      self.before.remove(step_name);
      self.on.remove(step_name);
      self.after.remove(step_name);
    }
  }

  pub fn set_optional(&mut self, step_name: &str, optional: bool) {
    self.ensure_step_exists(step_name);
    if let Some(step) = self.steps.iter_mut().find(|s| s.name == step_name) {
      step.optional = optional;
    }
  }
}
