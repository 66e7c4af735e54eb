// storefront/server/src/services/reconcile_service.rs

//! Periodic reconciliation of fallback orders into the durable ledger.

use std::sync::Arc;
use std::time::Duration;
use storefront::OrderPlacementService;
use tracing::{debug, info};

/// Spawns the reconciliation loop on the current actix runtime.
pub fn spawn_reconciliation(placement: Arc<OrderPlacementService>, every: Duration) -> actix_rt::task::JoinHandle<()> {
  info!(interval_secs = every.as_secs(), "Starting fallback reconciliation task.");
  actix_rt::spawn(async move {
    let mut ticker = actix_rt::time::interval(every);
    // The first tick completes immediately.
    ticker.tick().await;
    loop {
      ticker.tick().await;
      if placement.fallback().pending_len() == 0 {
        debug!("No fallback orders pending.");
        continue;
      }
      placement.reconcile_fallback_orders().await;
    }
  })
}
