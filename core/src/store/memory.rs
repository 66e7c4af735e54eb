// storefront/core/src/store/memory.rs

//! `MemoryStore`: an in-process implementation of all three durable
//! capabilities, for tests, benchmarks and local runs without a database.
//!
//! Each capability has an outage switch so callers can exercise the
//! degraded paths of the placement workflow.

use crate::model::{
  Expanded, NewOrder, NewUser, Order, OrderId, OrderView, Product, ProductFilter, ProductStatus, User,
};
use crate::store::{CatalogStore, IdentityStore, OrderLedger, StockDecrement, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Default)]
struct Switches {
  catalog_down: AtomicBool,
  stock_writes_down: AtomicBool,
  identity_down: AtomicBool,
  ledger_down: AtomicBool,
}

#[derive(Default)]
struct Inner {
  // A Mutex, not an RwLock: stock updates must be check-and-set under one guard.
  products: Mutex<HashMap<Uuid, Product>>,
  users: RwLock<HashMap<Uuid, User>>,
  orders: RwLock<Vec<Order>>,
  switches: Switches,
  lookups: AtomicUsize,
}

/// Cheap to clone; clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Inner>,
}

fn outage(what: &str) -> StoreError {
  StoreError::unavailable(anyhow::anyhow!("{} is offline", what))
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert_product(&self, product: Product) {
    self.inner.products.lock().insert(product.id, product);
  }

  pub fn insert_user(&self, user: User) {
    self.inner.users.write().insert(user.id, user);
  }

  /// Current stock of `id`, bypassing the outage switches.
  pub fn stock_of(&self, id: Uuid) -> Option<u32> {
    self.inner.products.lock().get(&id).map(|p| p.stock)
  }

  /// Every order in the ledger, bypassing the outage switches.
  pub fn all_orders(&self) -> Vec<Order> {
    self.inner.orders.read().clone()
  }

  /// Number of reads served by any capability so far.
  pub fn lookup_count(&self) -> usize {
    self.inner.lookups.load(Ordering::SeqCst)
  }

  pub fn set_catalog_available(&self, available: bool) {
    self.inner.switches.catalog_down.store(!available, Ordering::SeqCst);
  }

  /// Fails only `decrement_if_at_least` and `restock`; reads keep working.
  pub fn set_stock_writes_available(&self, available: bool) {
    self.inner.switches.stock_writes_down.store(!available, Ordering::SeqCst);
  }

  pub fn set_identity_available(&self, available: bool) {
    self.inner.switches.identity_down.store(!available, Ordering::SeqCst);
  }

  pub fn set_ledger_available(&self, available: bool) {
    self.inner.switches.ledger_down.store(!available, Ordering::SeqCst);
  }

  fn is_down(flag: &AtomicBool) -> bool {
    flag.load(Ordering::SeqCst)
  }

  fn count_lookup(&self) {
    self.inner.lookups.fetch_add(1, Ordering::SeqCst);
  }
}

#[async_trait]
impl CatalogStore for MemoryStore {
  async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
    self.count_lookup();
    if Self::is_down(&self.inner.switches.catalog_down) {
      return Err(outage("catalog"));
    }
    Ok(self.inner.products.lock().get(&id).cloned())
  }

  async fn list_products(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
    self.count_lookup();
    if Self::is_down(&self.inner.switches.catalog_down) {
      return Err(outage("catalog"));
    }
    let mut products: Vec<Product> = self
      .inner
      .products
      .lock()
      .values()
      .filter(|p| filter.matches(p))
      .cloned()
      .collect();
    filter.sort(&mut products);
    Ok(products)
  }

  async fn categories(&self) -> StoreResult<Vec<String>> {
    self.count_lookup();
    if Self::is_down(&self.inner.switches.catalog_down) {
      return Err(outage("catalog"));
    }
    let categories: BTreeSet<String> = self
      .inner
      .products
      .lock()
      .values()
      .filter(|p| p.status == ProductStatus::Active)
      .filter_map(|p| p.category.as_deref().map(str::trim))
      .filter(|c| !c.is_empty())
      .map(str::to_string)
      .collect();
    Ok(categories.into_iter().collect())
  }

  async fn decrement_if_at_least(&self, id: Uuid, quantity: u32) -> StoreResult<StockDecrement> {
    if Self::is_down(&self.inner.switches.catalog_down) || Self::is_down(&self.inner.switches.stock_writes_down) {
      return Err(outage("catalog"));
    }
    let mut products = self.inner.products.lock();
    let outcome = match products.get_mut(&id) {
      None => StockDecrement::NotFound,
      Some(p) if p.stock < quantity => StockDecrement::Insufficient { available: p.stock },
      Some(p) => {
        p.stock -= quantity;
        p.updated_at = Utc::now();
        StockDecrement::Applied { remaining: p.stock }
      }
    };
    Ok(outcome)
  }

  async fn restock(&self, id: Uuid, quantity: u32) -> StoreResult<()> {
    if Self::is_down(&self.inner.switches.catalog_down) || Self::is_down(&self.inner.switches.stock_writes_down) {
      return Err(outage("catalog"));
    }
    match self.inner.products.lock().get_mut(&id) {
      Some(p) => {
        p.stock = p.stock.saturating_add(quantity);
        p.updated_at = Utc::now();
        Ok(())
      }
      None => Err(StoreError::Conflict(format!("product {} no longer exists", id))),
    }
  }
}

#[async_trait]
impl IdentityStore for MemoryStore {
  async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
    self.count_lookup();
    if Self::is_down(&self.inner.switches.identity_down) {
      return Err(outage("identity store"));
    }
    Ok(self.inner.users.read().get(&id).cloned())
  }

  async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
    self.count_lookup();
    if Self::is_down(&self.inner.switches.identity_down) {
      return Err(outage("identity store"));
    }
    Ok(self.inner.users.read().values().find(|u| u.email == email).cloned())
  }

  async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
    if Self::is_down(&self.inner.switches.identity_down) {
      return Err(outage("identity store"));
    }
    let mut users = self.inner.users.write();
    if users.values().any(|u| u.email == new_user.email) {
      return Err(StoreError::Conflict(format!("email {} is already registered", new_user.email)));
    }
    let now = Utc::now();
    let user = User {
      id: Uuid::new_v4(),
      username: new_user.username,
      email: new_user.email,
      password_hash: new_user.password_hash,
      first_name: new_user.first_name,
      last_name: new_user.last_name,
      role: new_user.role,
      created_at: now,
      updated_at: now,
    };
    users.insert(user.id, user.clone());
    Ok(user)
  }
}

#[async_trait]
impl OrderLedger for MemoryStore {
  async fn insert_order(&self, order: NewOrder) -> StoreResult<Order> {
    if Self::is_down(&self.inner.switches.ledger_down) {
      return Err(outage("order ledger"));
    }
    let order = order.into_order(OrderId::Durable(Uuid::new_v4()));
    self.inner.orders.write().push(order.clone());
    Ok(order)
  }

  async fn orders_for_user(&self, user_id: Uuid) -> StoreResult<Vec<OrderView>> {
    self.count_lookup();
    if Self::is_down(&self.inner.switches.ledger_down) {
      return Err(outage("order ledger"));
    }
    let orders: Vec<Order> = self
      .inner
      .orders
      .read()
      .iter()
      .filter(|o| o.user_id == user_id)
      .cloned()
      .collect();

    let products = self.inner.products.lock();
    let users = self.inner.users.read();
    let views = orders
      .into_iter()
      .map(|order| {
        let product = products.get(&order.product_id).map(Product::summary);
        let user = users.get(&order.user_id).map(User::summary);
        let mut view = OrderView::from(order);
        if let Some(summary) = product {
          view.product_id = Expanded::Summary(summary);
        }
        if let Some(summary) = user {
          view.user_id = Expanded::Summary(summary);
        }
        view
      })
      .collect();
    Ok(views)
  }
}
