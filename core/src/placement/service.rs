// storefront/core/src/placement/service.rs

//! `OrderPlacementService`: PlaceOrder, ListOrdersForUser and reconciliation
//! of fallback orders into the durable ledger.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineResult;
use crate::model::{parse_id, OrderView};
use crate::pipeline::Pipeline;
use crate::placement::context::{Placement, PlacementCtxData, PlacementStores};
use crate::placement::error::PlacementError;
use crate::placement::request::PlaceOrderRequest;
use crate::placement::steps::build_placement_pipeline;
use crate::store::{CatalogStore, FallbackStore, IdentityStore, OrderLedger};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Where a listing was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSource {
  /// The durable ledger, with product and user references expanded.
  Durable,
  /// The fallback store. References are raw ids.
  Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderListing {
  pub source: ListingSource,
  pub orders: Vec<OrderView>,
}

/// Outcome of one reconciliation pass.
///
/// Fallback ids are provisional: a reconciled order gets a fresh ledger id,
/// and the `fallback-...` id returned at placement no longer resolves. The
/// pair is logged at INFO when the order moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
  /// Fallback orders now stored durably.
  pub reconciled: usize,
  /// Orders the ledger refused outright this pass (e.g. a constraint
  /// violation). They stay in the fallback store.
  pub rejected: usize,
  /// Fallback orders still waiting for the ledger, rejected ones included.
  pub remaining: usize,
}

pub struct OrderPlacementService {
  stores: PlacementStores,
  pipeline: Pipeline<PlacementCtxData, PlacementError>,
}

impl OrderPlacementService {
  pub fn new(
    catalog: Arc<dyn CatalogStore>,
    identity: Arc<dyn IdentityStore>,
    ledger: Arc<dyn OrderLedger>,
    fallback: Arc<FallbackStore>,
  ) -> Self {
    Self {
      stores: PlacementStores {
        catalog,
        identity,
        ledger,
        fallback,
      },
      pipeline: build_placement_pipeline(),
    }
  }

  pub fn fallback(&self) -> &Arc<FallbackStore> {
    &self.stores.fallback
  }

  /// Validates the request, reserves stock and records the order.
  ///
  /// A ledger outage does not fail the call: the order is recorded in the
  /// fallback store and returned as `Placement::Fallback`.
  #[instrument(
    name = "placement::place_order",
    skip_all,
    fields(user_id = ?request.user_id, product_id = ?request.product_id)
  )]
  pub async fn place_order(&self, request: PlaceOrderRequest) -> Result<Placement, PlacementError> {
    let ctx_data = ContextData::new(PlacementCtxData::new(self.stores.clone(), request));

    match self.pipeline.run(ctx_data.clone()).await? {
      PipelineResult::Completed => {
        let placement = ctx_data.write().placement.take();
        placement.ok_or_else(|| PlacementError::Internal("placement completed without an order record".to_string()))
      }
      PipelineResult::Stopped => Err(PlacementError::Internal("placement was halted before an order was recorded".to_string())),
    }
  }

  /// Orders placed by `raw_user_id`: the ledger's, followed by any still
  /// pending in the fallback store (unexpanded). Only the fallback orders
  /// are served when the ledger cannot be read.
  #[instrument(name = "placement::list_orders_for_user", skip(self))]
  pub async fn list_orders_for_user(&self, raw_user_id: &str) -> Result<OrderListing, PlacementError> {
    let user_id = parse_id(raw_user_id).ok_or(PlacementError::InvalidIdentifier { what: "user ID" })?;

    match self.stores.ledger.orders_for_user(user_id).await {
      Ok(mut orders) => {
        // Orders not yet reconciled are still the buyer's.
        let pending = self.stores.fallback.orders_for_user(user_id);
        debug!(%user_id, count = orders.len(), pending = pending.len(), "Orders read from ledger.");
        orders.extend(pending.into_iter().map(OrderView::from));
        Ok(OrderListing {
          source: ListingSource::Durable,
          orders,
        })
      }
      Err(store_err) => {
        warn!(%user_id, error = %store_err, "Ledger read failed; serving fallback orders.");
        let orders = self
          .stores
          .fallback
          .orders_for_user(user_id)
          .into_iter()
          .map(OrderView::from)
          .collect();
        Ok(OrderListing {
          source: ListingSource::Fallback,
          orders,
        })
      }
    }
  }

  /// Moves fallback orders into the ledger, oldest first.
  ///
  /// An order the ledger refuses is skipped and kept; the pass carries on
  /// with the next one. A transient failure (ledger unreachable) ends the
  /// pass, leaving that order and everything after it for the next one.
  #[instrument(name = "placement::reconcile_fallback_orders", skip(self))]
  pub async fn reconcile_fallback_orders(&self) -> ReconcileReport {
    let pending = self.stores.fallback.pending_orders();
    if pending.is_empty() {
      return ReconcileReport::default();
    }

    let mut reconciled = 0;
    let mut rejected = 0;
    for order in pending {
      match self.stores.ledger.insert_order(order.to_new_order()).await {
        Ok(durable) => {
          self.stores.fallback.remove_order(&order.id);
          info!(fallback_id = %order.id, durable_id = %durable.id, "Fallback order reconciled.");
          reconciled += 1;
        }
        Err(store_err) if store_err.is_transient() => {
          warn!(fallback_id = %order.id, error = %store_err, "Ledger still unavailable; reconciliation paused.");
          break;
        }
        Err(store_err) => {
          warn!(fallback_id = %order.id, error = %store_err, "Ledger rejected fallback order; skipping it.");
          rejected += 1;
        }
      }
    }

    let report = ReconcileReport {
      reconciled,
      rejected,
      remaining: self.stores.fallback.pending_len(),
    };
    info!(
      reconciled = report.reconciled,
      rejected = report.rejected,
      remaining = report.remaining,
      "Reconciliation pass finished."
    );
    report
  }
}
