// tests/common/mod.rs
#![allow(dead_code)]

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use storefront::model::{Product, ProductStatus, Role, User};
use storefront::{ContextData, FallbackStore, MemoryStore, OrderPlacementService, PipelineControl, PipelineError};
use tracing::Level;
use uuid::Uuid;

// --- Pipeline engine fixtures ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Pipeline error: {0}")]
  Pipeline(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<PipelineError> for TestError {
  fn from(pe: PipelineError) -> Self {
    TestError::Pipeline(format!("{:?}", pe))
  }
}

pub fn create_simple_handler(
  step_name: &'static str,
  message_to_append: &'static str,
) -> storefront::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name.to_string());
      if guard.should_stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn create_failing_handler(
  step_name: &'static str,
  error_message: &'static str,
) -> storefront::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Handler(error_message.to_string()))
    })
  })
}

// --- Store fixtures ---
pub fn product(name: &str, price: Decimal, stock: u32) -> Product {
  let now = Utc::now();
  Product {
    id: Uuid::new_v4(),
    name: name.to_string(),
    description: format!("{} for testing", name),
    price,
    stock,
    category: Some("Test".to_string()),
    image_url: None,
    status: ProductStatus::Active,
    created_at: now,
    updated_at: now,
  }
}

pub fn buyer(username: &str) -> User {
  let now = Utc::now();
  User {
    id: Uuid::new_v4(),
    username: username.to_string(),
    email: format!("{}@example.com", username),
    password_hash: String::new(),
    first_name: Some("Test".to_string()),
    last_name: None,
    role: Role::Buyer,
    created_at: now,
    updated_at: now,
  }
}

/// A placement service over one `MemoryStore` acting as catalog, identity
/// store and ledger.
pub struct Harness {
  pub store: MemoryStore,
  pub fallback: Arc<FallbackStore>,
  pub service: OrderPlacementService,
}

impl Harness {
  pub fn new() -> Self {
    Self::with_fallback_capacity(100)
  }

  pub fn with_fallback_capacity(capacity: usize) -> Self {
    let store = MemoryStore::new();
    let fallback = Arc::new(FallbackStore::new(capacity));
    let service = OrderPlacementService::new(
      Arc::new(store.clone()),
      Arc::new(store.clone()),
      Arc::new(store.clone()),
      fallback.clone(),
    );
    Self {
      store,
      fallback,
      service,
    }
  }

  pub fn add_buyer(&self, username: &str) -> User {
    let user = buyer(username);
    self.store.insert_user(user.clone());
    user
  }

  pub fn add_product(&self, name: &str, price: Decimal, stock: u32) -> Product {
    let product = product(name, price, stock);
    self.store.insert_product(product.clone());
    product
  }
}

// --- Tracing ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
