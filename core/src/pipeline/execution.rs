// storefront/core/src/pipeline/execution.rs

//! `Pipeline::run()`: executes the steps and their hooks in order.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::error::PipelineError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, info_span, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Executes every step against `ctx_data`.
  ///
  /// Each step runs its `before`, `on` and `after` hooks in registration order.
  /// The first handler error aborts the run and is returned as is; a handler
  /// returning `PipelineControl::Stop` ends the run with `PipelineResult::Stopped`.
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(
      Level::DEBUG,
      context_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
      "Pipeline execution starting."
    );

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();
      let step_span = info_span!(
        "pipeline_step",
        step_name = step_name,
        step_index = step_idx,
        optional = step_def.optional
      );

      let phases = [
        ("before", self.before.get(step_name)),
        ("on", self.on.get(step_name)),
        ("after", self.after.get(step_name)),
      ];

      let has_handlers = phases.iter().any(|(_, hs)| hs.map_or(false, |v| !v.is_empty()));
      if !has_handlers {
        if step_def.optional {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(parent: &step_span, Level::ERROR, "Non-optional step has no handlers.");
        return Err(Err::from(PipelineError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      for (phase, handlers) in phases {
        let Some(handlers) = handlers else { continue };
        let control = run_phase(phase, handlers, &ctx_data)
          .instrument(step_span.clone())
          .await?;
        if control == PipelineControl::Stop {
          event!(parent: &step_span, Level::INFO, phase, "Pipeline stopped by a handler.");
          return Ok(PipelineResult::Stopped);
        }
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }
}

async fn run_phase<TData, Err>(
  phase: &'static str,
  handlers: &[Handler<TData, Err>],
  ctx_data: &ContextData<TData>,
) -> Result<PipelineControl, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + Send + Sync + 'static,
{
  for (handler_idx, handler_fn) in handlers.iter().enumerate() {
    match handler_fn(ctx_data.clone()).await {
      Ok(PipelineControl::Continue) => {}
      Ok(PipelineControl::Stop) => return Ok(PipelineControl::Stop),
      Err(e) => {
        event!(Level::DEBUG, phase, handler_index = handler_idx, error = %e, "Handler failed.");
        return Err(e);
      }
    }
  }
  Ok(PipelineControl::Continue)
}
