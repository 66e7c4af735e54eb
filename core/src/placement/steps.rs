// storefront/core/src/placement/steps.rs

//! The PlaceOrder pipeline: one named step per stage of the workflow.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::model::{NewOrder, OrderStatus};
use crate::pipeline::Pipeline;
use crate::placement::context::{Placement, PlacementCtxData, ProductSource, ResolvedProduct};
use crate::placement::error::PlacementError;
use crate::store::StockDecrement;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

pub const VALIDATE_ORDER_REQUEST: &str = "validate_order_request";
pub const RESOLVE_BUYER: &str = "resolve_buyer";
pub const RESOLVE_PRODUCT: &str = "resolve_product";
pub const CHECK_STOCK: &str = "check_stock";
pub const PRICE_ORDER: &str = "price_order";
pub const RESERVE_STOCK: &str = "reserve_stock";
pub const RECORD_ORDER: &str = "record_order";

pub(crate) fn build_placement_pipeline() -> Pipeline<PlacementCtxData, PlacementError> {
  let mut p = Pipeline::<PlacementCtxData, PlacementError>::new(&[
    (VALIDATE_ORDER_REQUEST, false),
    (RESOLVE_BUYER, false),
    (RESOLVE_PRODUCT, false),
    (CHECK_STOCK, false),
    (PRICE_ORDER, false),
    (RESERVE_STOCK, false),
    (RECORD_ORDER, false),
  ]);

  // Step 1: presence and shape of the four inputs. No I/O.
  p.on_root(VALIDATE_ORDER_REQUEST, |ctx_data: ContextData<PlacementCtxData>| {
    Box::pin(async move {
      let validated = { ctx_data.read().request.validate() };
      match validated {
        Ok(validated) => {
          debug!(user_id = %validated.user_id, product_id = %validated.product_id, quantity = validated.quantity, "Order request validated.");
          ctx_data.write().validated = Some(validated);
          Ok(PipelineControl::Continue)
        }
        Err(e) => {
          warn!(error = %e, "Order request rejected.");
          Err(e)
        }
      }
    })
  });

  // Step 2: the buyer must exist.
  p.on_root(RESOLVE_BUYER, |ctx_data: ContextData<PlacementCtxData>| {
    Box::pin(async move {
      let (identity, user_id) = {
        let guard = ctx_data.read();
        (guard.stores.identity.clone(), guard.validated()?.user_id)
      };

      match identity.find_user(user_id).await {
        Ok(Some(user)) => {
          ctx_data.write().buyer = Some(user);
          Ok(PipelineControl::Continue)
        }
        Ok(None) => {
          warn!(%user_id, "Buyer not found.");
          Err(PlacementError::UserNotFound)
        }
        Err(store_err) => {
          error!(%user_id, error = %store_err, "Identity store failed while resolving buyer.");
          Err(PlacementError::Internal(format!("identity lookup failed: {}", store_err)))
        }
      }
    })
  });

  // Step 3: durable catalog first; the fallback catalog when that misses or fails.
  p.on_root(RESOLVE_PRODUCT, |ctx_data: ContextData<PlacementCtxData>| {
    Box::pin(async move {
      let (catalog, fallback, product_id, id_requested) = {
        let guard = ctx_data.read();
        (
          guard.stores.catalog.clone(),
          guard.stores.fallback.clone(),
          guard.validated()?.product_id,
          guard.request.product_id.clone().unwrap_or_default(),
        )
      };

      let durable = match catalog.find_product(product_id).await {
        Ok(found) => found,
        Err(store_err) => {
          warn!(%product_id, error = %store_err, "Catalog lookup failed; trying fallback catalog.");
          None
        }
      };

      let resolved = match durable {
        Some(product) => ResolvedProduct {
          product,
          source: ProductSource::Durable,
        },
        None => match fallback.product(product_id) {
          Some(product) => {
            info!(%product_id, "Product resolved from fallback catalog.");
            ResolvedProduct {
              product,
              source: ProductSource::Fallback,
            }
          }
          None => {
            warn!(%product_id, "Product not found in any catalog.");
            return Err(PlacementError::ProductNotFound { id_requested });
          }
        },
      };

      ctx_data.write().product = Some(resolved);
      Ok(PipelineControl::Continue)
    })
  });

  // Step 4: early, informative stock check against the resolved snapshot.
  p.on_root(CHECK_STOCK, |ctx_data: ContextData<PlacementCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      let quantity = guard.validated()?.quantity;
      let resolved = guard.resolved_product()?;
      if resolved.product.stock < quantity {
        warn!(
          product_id = %resolved.product.id,
          requested = quantity,
          available = resolved.product.stock,
          "Insufficient stock."
        );
        return Err(PlacementError::InsufficientStock {
          available: resolved.product.stock,
        });
      }
      Ok(PipelineControl::Continue)
    })
  });

  // Step 5: total from the authoritative catalog price.
  p.on_root(PRICE_ORDER, |ctx_data: ContextData<PlacementCtxData>| {
    Box::pin(async move {
      let total = {
        let guard = ctx_data.read();
        let quantity = guard.validated()?.quantity;
        guard.resolved_product()?.product.price * Decimal::from(quantity)
      };
      ctx_data.write().total_amount = Some(total);
      Ok::<_, PlacementError>(PipelineControl::Continue)
    })
  });

  // Step 6: atomic conditional decrement on the catalog the product came from.
  p.on_root(RESERVE_STOCK, |ctx_data: ContextData<PlacementCtxData>| {
    Box::pin(async move {
      let (catalog, fallback, product_id, source, quantity, id_requested) = {
        let guard = ctx_data.read();
        let resolved = guard.resolved_product()?;
        (
          guard.stores.catalog.clone(),
          guard.stores.fallback.clone(),
          resolved.product.id,
          resolved.source,
          guard.validated()?.quantity,
          guard.request.product_id.clone().unwrap_or_default(),
        )
      };

      let outcome = match source {
        ProductSource::Durable => catalog.decrement_if_at_least(product_id, quantity).await.map_err(|store_err| {
          error!(%product_id, quantity, error = %store_err, "Stock decrement failed.");
          PlacementError::StockUpdateFailed { source: store_err }
        })?,
        ProductSource::Fallback => fallback.decrement_if_at_least(product_id, quantity),
      };

      match outcome {
        StockDecrement::Applied { remaining } => {
          debug!(%product_id, quantity, remaining, ?source, "Stock reserved.");
          ctx_data.write().reserved = true;
          Ok(PipelineControl::Continue)
        }
        StockDecrement::Insufficient { available } => {
          // Another order took the stock between the check and the decrement.
          warn!(%product_id, quantity, available, "Stock reservation lost to a concurrent order.");
          Err(PlacementError::InsufficientStock { available })
        }
        StockDecrement::NotFound => {
          warn!(%product_id, "Product disappeared before stock could be reserved.");
          Err(PlacementError::ProductNotFound { id_requested })
        }
      }
    })
  });

  // Step 7: durable ledger first, the fallback store when the ledger is down.
  p.on_root(RECORD_ORDER, |ctx_data: ContextData<PlacementCtxData>| {
    Box::pin(async move {
      let (stores, new_order, source) = {
        let guard = ctx_data.read();
        let validated = guard.validated()?;
        let new_order = NewOrder {
          user_id: validated.user_id,
          product_id: validated.product_id,
          quantity: validated.quantity,
          address: validated.address.clone(),
          total_amount: guard.total()?,
          status: OrderStatus::Pending,
          created_at: Utc::now(),
        };
        (guard.stores.clone(), new_order, guard.resolved_product()?.source)
      };

      let placement = match stores.ledger.insert_order(new_order.clone()).await {
        Ok(order) => Placement::Durable(order),
        Err(store_err) => {
          warn!(error = %store_err, "Order ledger write failed; recording order in fallback store.");
          match stores.fallback.record_order(new_order.clone()) {
            Ok(order) => Placement::Fallback(order),
            Err(fallback_err) => {
              // Nowhere to record the order: give the reserved units back.
              let restored = match source {
                ProductSource::Durable => stores
                  .catalog
                  .restock(new_order.product_id, new_order.quantity)
                  .await
                  .map_err(|e| e.to_string()),
                ProductSource::Fallback => {
                  if stores.fallback.restock(new_order.product_id, new_order.quantity) {
                    Ok(())
                  } else {
                    Err("product missing from fallback catalog".to_string())
                  }
                }
              };
              match restored {
                Ok(()) => ctx_data.write().reserved = false,
                Err(reason) => error!(
                  product_id = %new_order.product_id,
                  quantity = new_order.quantity,
                  %reason,
                  "Could not restore reserved stock after a failed order write."
                ),
              }
              return Err(PlacementError::Internal(format!(
                "order could not be recorded: ledger: {}; fallback: {}",
                store_err, fallback_err
              )));
            }
          }
        }
      };

      ctx_data.write().placement = Some(placement);
      Ok(PipelineControl::Continue)
    })
  });

  p.after_root(RECORD_ORDER, |ctx_data: ContextData<PlacementCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      match &guard.placement {
        Some(Placement::Fallback(order)) => warn!(
          order_id = %order.id,
          pending = guard.stores.fallback.pending_len(),
          "Order accepted in degraded mode; it exists only in this process until reconciled."
        ),
        Some(Placement::Durable(order)) => info!(order_id = %order.id, "Order recorded in ledger."),
        None => {}
      }
      Ok::<_, PlacementError>(PipelineControl::Continue)
    })
  });

  p
}
