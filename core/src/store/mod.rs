// storefront/core/src/store/mod.rs

//! Durable-store capabilities used by the placement workflow, the bounded
//! in-memory fallback, and in-memory adapters of the durable capabilities.
//!
//! Every operation is an I/O suspension point. Implementations must make
//! `decrement_if_at_least` a single atomic check-and-update: this is what keeps
//! concurrent orders from overselling a product.

pub mod error;
pub mod fallback;
pub mod memory;

pub use error::{StoreError, StoreResult};
pub use fallback::{FallbackError, FallbackStore};
pub use memory::MemoryStore;

use crate::model::{NewOrder, NewUser, Order, OrderView, Product, ProductFilter, User};
use async_trait::async_trait;
use uuid::Uuid;

/// Result of an atomic conditional stock decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDecrement {
  /// Stock was at least the requested quantity and has been reduced.
  Applied { remaining: u32 },
  /// Stock was below the requested quantity; nothing changed.
  Insufficient { available: u32 },
  NotFound,
}

/// Product records (the Catalog Store).
#[async_trait]
pub trait CatalogStore: Send + Sync {
  async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>>;

  async fn list_products(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>>;

  /// Distinct, non-empty categories of active products, sorted.
  async fn categories(&self) -> StoreResult<Vec<String>>;

  /// Reduces stock by `quantity` only if at least `quantity` is on hand.
  async fn decrement_if_at_least(&self, id: Uuid, quantity: u32) -> StoreResult<StockDecrement>;

  /// Adds `quantity` back. Used to undo a reservation.
  async fn restock(&self, id: Uuid, quantity: u32) -> StoreResult<()>;
}

/// User accounts (the Identity Store).
#[async_trait]
pub trait IdentityStore: Send + Sync {
  async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

  async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

  /// Fails with `StoreError::Conflict` when the email is taken.
  async fn create_user(&self, new_user: NewUser) -> StoreResult<User>;
}

/// Placed orders (the Order Ledger).
#[async_trait]
pub trait OrderLedger: Send + Sync {
  /// Persists `order` under a fresh durable id.
  async fn insert_order(&self, order: NewOrder) -> StoreResult<Order>;

  /// Orders of `user_id` in the ledger's natural order, with product and
  /// user references expanded where the referenced records exist.
  async fn orders_for_user(&self, user_id: Uuid) -> StoreResult<Vec<OrderView>>;
}
