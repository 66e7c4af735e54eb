// storefront/core/src/core/context_data.rs
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared, lockable state threaded through every step of a pipeline run.
///
/// Lock guards are blocking and MUST NOT be held across `.await` points.
/// Copy what a step needs out of the guard, drop it, then do the I/O.
#[derive(Debug)]
pub struct ContextData<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> ContextData<T> {
  pub fn new(data: T) -> Self {
    ContextData(Arc::new(RwLock::new(data)))
  }

  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read()
  }

  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write()
  }

  /// Takes the data out if this is the last handle, otherwise clones it.
  /// Used by callers that want the final state once a run is over.
  pub fn into_inner(self) -> T
  where
    T: Clone,
  {
    match Arc::try_unwrap(self.0) {
      Ok(lock) => lock.into_inner(),
      Err(shared) => shared.read().clone(),
    }
  }
}

impl<T: Send + Sync + 'static> Clone for ContextData<T> {
  fn clone(&self) -> Self {
    ContextData(Arc::clone(&self.0))
  }
}

impl<T: Send + Sync + 'static + Default> Default for ContextData<T> {
  fn default() -> Self {
    Self::new(Default::default())
  }
}
