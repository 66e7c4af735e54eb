// tests/registry_tests.rs
mod common;

use common::*;
use storefront::{ContextData, Pipeline, PipelineControl, PipelineError, PipelineResult, Workflows};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct RegistryContextAlpha {
  val: String,
}
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct RegistryContextBeta {
  num: i32,
}

#[tokio::test]
async fn test_registry_run_correct_pipeline() {
  setup_tracing();
  let workflows = Workflows::<TestError>::new();

  let mut p_alpha = Pipeline::<RegistryContextAlpha, TestError>::new(&[("alpha_task", false)]);
  p_alpha.on_root("alpha_task", |ctx: ContextData<RegistryContextAlpha>| {
    Box::pin(async move {
      ctx.write().val = "alpha_processed".to_string();
      Ok::<PipelineControl, TestError>(PipelineControl::Continue)
    })
  });
  workflows.register_pipeline(p_alpha);

  let mut p_beta = Pipeline::<RegistryContextBeta, TestError>::new(&[("beta_task", false)]);
  p_beta.on_root("beta_task", |ctx: ContextData<RegistryContextBeta>| {
    Box::pin(async move {
      ctx.write().num = 100;
      Ok::<PipelineControl, TestError>(PipelineControl::Continue)
    })
  });
  workflows.register_pipeline(p_beta);

  assert!(workflows.is_registered::<RegistryContextAlpha>());
  assert!(workflows.is_registered::<RegistryContextBeta>());

  let ctx_alpha = ContextData::new(RegistryContextAlpha::default());
  let res_alpha = workflows.run(ctx_alpha.clone()).await;
  assert_eq!(res_alpha.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx_alpha.read().val, "alpha_processed");

  let ctx_beta = ContextData::new(RegistryContextBeta::default());
  let res_beta = workflows.run(ctx_beta.clone()).await;
  assert_eq!(res_beta.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx_beta.read().num, 100);
}

#[tokio::test]
async fn test_registry_pipeline_not_found() {
  setup_tracing();
  let workflows = Workflows::<TestError>::new();

  #[derive(Clone, Debug, Default)]
  struct UnregisteredContext;

  let result = workflows.run(ContextData::new(UnregisteredContext)).await;

  match result {
    Err(TestError::Pipeline(s)) => {
      assert!(s.contains("WorkflowNotRegistered"));
      assert!(s.contains("UnregisteredContext"));
    }
    other => panic!("Expected WorkflowNotRegistered, got {:?}", other),
  }
}

#[tokio::test]
async fn test_registry_pipeline_itself_errors() {
  setup_tracing();
  let workflows = Workflows::<TestError>::new();

  let mut p_alpha = Pipeline::<RegistryContextAlpha, TestError>::new(&[("alpha_fail", false)]);
  p_alpha.on_root("alpha_fail", |_ctx: ContextData<RegistryContextAlpha>| {
    Box::pin(async move { Err::<PipelineControl, TestError>(TestError::Handler("Alpha pipeline failed".to_string())) })
  });
  workflows.register_pipeline(p_alpha);

  let res_alpha = workflows.run(ContextData::new(RegistryContextAlpha::default())).await;

  assert_eq!(res_alpha, Err(TestError::Handler("Alpha pipeline failed".to_string())));
}

#[tokio::test]
async fn test_registry_with_default_error_type() {
  setup_tracing();
  let workflows = Workflows::<PipelineError>::default();

  #[derive(Clone, Debug, Default)]
  struct SimpleCtx {
    count: i32,
  }

  let mut pipeline = Pipeline::<SimpleCtx, PipelineError>::new(&[("task", false)]);
  pipeline.on_root("task", |ctx: ContextData<SimpleCtx>| {
    Box::pin(async move {
      ctx.write().count = 1;
      Ok::<PipelineControl, PipelineError>(PipelineControl::Continue)
    })
  });
  workflows.register_pipeline(pipeline);

  let ctx = ContextData::new(SimpleCtx::default());
  let result = workflows.run(ctx.clone()).await;
  assert!(result.is_ok());
  assert_eq!(ctx.read().count, 1);
}
