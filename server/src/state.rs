// storefront/server/src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::pipelines;
use crate::services::session_service::SessionRegistry;
use std::sync::Arc;
use storefront::{CatalogStore, FallbackStore, IdentityStore, OrderLedger, OrderPlacementService, Workflows};

/// The durable stores the server runs against.
#[derive(Clone)]
pub struct Stores {
  pub catalog: Arc<dyn CatalogStore>,
  pub identity: Arc<dyn IdentityStore>,
  pub ledger: Arc<dyn OrderLedger>,
}

impl Stores {
  /// One backend serving all three capabilities.
  pub fn from_backend<S>(backend: S) -> Self
  where
    S: CatalogStore + IdentityStore + OrderLedger + Clone + 'static,
  {
    Self {
      catalog: Arc::new(backend.clone()),
      identity: Arc::new(backend.clone()),
      ledger: Arc::new(backend),
    }
  }
}

#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  pub catalog: Arc<dyn CatalogStore>,
  pub identity: Arc<dyn IdentityStore>,
  pub placement: Arc<OrderPlacementService>,
  pub sessions: Arc<SessionRegistry>,
  pub workflows: Arc<Workflows<AppError>>,
}

impl AppState {
  /// Wires the placement service and session registry over `stores` and
  /// registers the auth pipelines.
  pub fn new(config: Arc<AppConfig>, stores: Stores, fallback: Arc<FallbackStore>) -> Self {
    let placement = Arc::new(OrderPlacementService::new(
      stores.catalog.clone(),
      stores.identity.clone(),
      stores.ledger,
      fallback,
    ));

    let workflows = Arc::new(Workflows::<AppError>::new());
    pipelines::register_all_pipelines(&workflows);

    Self {
      sessions: Arc::new(SessionRegistry::new(config.session_ttl)),
      config,
      catalog: stores.catalog,
      identity: stores.identity,
      placement,
      workflows,
    }
  }
}
