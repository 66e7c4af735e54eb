// storefront/core/src/core/context.rs

//! The `Handler<TData, Err>` type used for every step hook.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// An async step hook.
///
/// Receives a clone of the run's `ContextData<TData>` and resolves to a
/// `PipelineControl` or the pipeline's error type. Handlers must release any
/// lock guard before awaiting.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;
