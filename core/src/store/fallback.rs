// storefront/core/src/store/fallback.rs

//! The process-local fallback used while the durable stores are unreachable.
//!
//! It is not a cache. Orders written here exist only in this process until a
//! reconciliation pass moves them into the durable ledger; they are lost on
//! restart and invisible to other instances. The order list is bounded.

use crate::model::{NewOrder, Order, OrderId, Product};
use crate::store::StockDecrement;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FallbackError {
  #[error("Fallback order store is full ({capacity} orders)")]
  Full { capacity: usize },
}

#[derive(Debug)]
pub struct FallbackStore {
  capacity: usize,
  orders: RwLock<Vec<Order>>,
  products: RwLock<HashMap<Uuid, Product>>,
  seq: AtomicU64,
}

impl FallbackStore {
  pub fn new(capacity: usize) -> Self {
    Self {
      capacity,
      orders: RwLock::new(Vec::new()),
      products: RwLock::new(HashMap::new()),
      seq: AtomicU64::new(0),
    }
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  // --- Orders ---

  /// Appends `order` under a synthetic `fallback-<millis>-<seq>` id.
  pub fn record_order(&self, order: NewOrder) -> Result<Order, FallbackError> {
    let mut orders = self.orders.write();
    if orders.len() >= self.capacity {
      warn!(capacity = self.capacity, "Fallback order store is full; rejecting order.");
      return Err(FallbackError::Full { capacity: self.capacity });
    }
    let seq = self.seq.fetch_add(1, Ordering::Relaxed);
    let id = OrderId::Fallback(format!(
      "{}{}-{}",
      OrderId::FALLBACK_PREFIX,
      Utc::now().timestamp_millis(),
      seq
    ));
    let order = order.into_order(id);
    orders.push(order.clone());
    debug!(order_id = %order.id, pending = orders.len(), "Order recorded in fallback store.");
    Ok(order)
  }

  /// Orders of `user_id`, in insertion order.
  pub fn orders_for_user(&self, user_id: Uuid) -> Vec<Order> {
    self.orders.read().iter().filter(|o| o.user_id == user_id).cloned().collect()
  }

  /// A copy of every pending fallback order, in insertion order.
  pub fn pending_orders(&self) -> Vec<Order> {
    self.orders.read().clone()
  }

  /// Drops the order with `id`; returns whether it was present.
  pub fn remove_order(&self, id: &OrderId) -> bool {
    let mut orders = self.orders.write();
    let before = orders.len();
    orders.retain(|o| &o.id != id);
    orders.len() != before
  }

  pub fn pending_len(&self) -> usize {
    self.orders.read().len()
  }

  // --- Products ---

  /// Loads product copies that orders may be placed against when the durable
  /// catalog cannot resolve them. Existing entries with the same id are replaced.
  pub fn seed_products(&self, products: impl IntoIterator<Item = Product>) -> usize {
    let mut map = self.products.write();
    let mut count = 0;
    for product in products {
      map.insert(product.id, product);
      count += 1;
    }
    count
  }

  pub fn product(&self, id: Uuid) -> Option<Product> {
    self.products.read().get(&id).cloned()
  }

  /// Atomic compare-and-decrement on the fallback copy of a product.
  pub fn decrement_if_at_least(&self, id: Uuid, quantity: u32) -> StockDecrement {
    let mut products = self.products.write();
    match products.get_mut(&id) {
      None => StockDecrement::NotFound,
      Some(product) if product.stock < quantity => StockDecrement::Insufficient {
        available: product.stock,
      },
      Some(product) => {
        product.stock -= quantity;
        product.updated_at = Utc::now();
        StockDecrement::Applied {
          remaining: product.stock,
        }
      }
    }
  }

  /// Returns `quantity` units to the fallback copy. Returns `false` if the
  /// product is not in the fallback catalog.
  pub fn restock(&self, id: Uuid, quantity: u32) -> bool {
    match self.products.write().get_mut(&id) {
      Some(product) => {
        product.stock = product.stock.saturating_add(quantity);
        product.updated_at = Utc::now();
        true
      }
      None => false,
    }
  }
}
