// storefront/core/src/registry.rs

//! `Workflows<E>`: a registry of pipelines keyed by their context data type.
//!
//! The HTTP layer registers one pipeline per request workflow at startup and
//! dispatches by handing over a `ContextData<TData>`; the matching pipeline is
//! found through `TypeId::of::<TData>()`.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineResult;
use crate::error::PipelineError;
use crate::pipeline::definition::Pipeline;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, Level};

#[async_trait]
trait ErasedWorkflow<AppErr>: Send + Sync
where
  AppErr: std::error::Error + Send + Sync + 'static,
{
  /// `ctx_obj` must hold a `ContextData<TData>` for the wrapped pipeline's `TData`.
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, AppErr>;
}

struct TypedWorkflow<TData, HandlerErr, AppErr>
where
  TData: 'static + Send + Sync,
  HandlerErr: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  pipeline: Arc<Pipeline<TData, HandlerErr>>,
  _phantom_app_err: PhantomData<fn() -> AppErr>,
}

#[async_trait]
impl<TData, HandlerErr, AppErr> ErasedWorkflow<AppErr> for TypedWorkflow<TData, HandlerErr, AppErr>
where
  TData: 'static + Send + Sync,
  HandlerErr: std::error::Error + From<PipelineError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<HandlerErr> + From<PipelineError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, AppErr> {
    let typed_ctx_data = match ctx_obj.downcast::<ContextData<TData>>() {
      Ok(boxed) => *boxed,
      Err(_) => {
        let expected_type = std::any::type_name::<ContextData<TData>>().to_string();
        event!(Level::ERROR, %expected_type, "Workflow context type mismatch.");
        return Err(AppErr::from(PipelineError::TypeMismatch { expected_type }));
      }
    };
    self.pipeline.run(typed_ctx_data).await.map_err(AppErr::from)
  }
}

/// Registry of workflows. `AppErr` is the error type `run` returns.
pub struct Workflows<AppErr = PipelineError>
where
  AppErr: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  registry: RwLock<HashMap<TypeId, Arc<dyn ErasedWorkflow<AppErr>>>>,
}

impl<AppErr> Default for Workflows<AppErr>
where
  AppErr: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<AppErr> Workflows<AppErr>
where
  AppErr: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      registry: RwLock::new(HashMap::new()),
    }
  }

  /// Registers `pipeline` as the workflow for `TData`, replacing any earlier one.
  pub fn register_pipeline<TData, HandlerErr>(&self, pipeline: Pipeline<TData, HandlerErr>)
  where
    TData: 'static + Send + Sync,
    HandlerErr: std::error::Error + From<PipelineError> + Send + Sync + 'static,
    AppErr: From<HandlerErr>,
  {
    event!(Level::DEBUG, context_type = %std::any::type_name::<TData>(), "Registering workflow.");
    let workflow = TypedWorkflow::<TData, HandlerErr, AppErr> {
      pipeline: Arc::new(pipeline),
      _phantom_app_err: PhantomData,
    };
    self.registry.write().insert(TypeId::of::<TData>(), Arc::new(workflow));
  }

  pub fn is_registered<TData: 'static>(&self) -> bool {
    self.registry.read().contains_key(&TypeId::of::<TData>())
  }

  /// Runs the workflow registered for `TData` against `ctx_data`.
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, AppErr>
  where
    TData: 'static + Send + Sync,
  {
    let runner = {
      let registry = self.registry.read();
      registry.get(&TypeId::of::<TData>()).cloned()
    };
    let runner = runner.ok_or_else(|| {
      let type_name = std::any::type_name::<TData>().to_string();
      event!(Level::ERROR, %type_name, "No workflow registered.");
      AppErr::from(PipelineError::WorkflowNotRegistered { type_name })
    })?;

    runner.run_erased(Box::new(ctx_data)).await
  }
}
