// tests/concurrency_tests.rs
mod common;

use common::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use storefront::{FallbackStore, MemoryStore, OrderPlacementService, PlaceOrderRequest, PlacementError};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_orders_never_oversell() {
  setup_tracing();
  const STOCK: u32 = 10;
  const CALLS: usize = 40;

  let store = MemoryStore::new();
  let user = buyer("rush");
  let lamp = product("Lamp", Decimal::new(1000, 2), STOCK);
  store.insert_user(user.clone());
  store.insert_product(lamp.clone());

  let service = Arc::new(OrderPlacementService::new(
    Arc::new(store.clone()),
    Arc::new(store.clone()),
    Arc::new(store.clone()),
    Arc::new(FallbackStore::new(100)),
  ));

  let mut handles = Vec::with_capacity(CALLS);
  for i in 0..CALLS {
    let service = service.clone();
    let request = PlaceOrderRequest::new(user.id.to_string(), lamp.id.to_string(), 1 + (i % 3) as u32, "1 Main St");
    handles.push(tokio::spawn(async move { service.place_order(request).await }));
  }

  let mut deducted = 0u32;
  for handle in handles {
    match handle.await.unwrap() {
      Ok(placement) => deducted += placement.order().quantity,
      Err(PlacementError::InsufficientStock { .. }) => {}
      Err(other) => panic!("Unexpected placement error: {:?}", other),
    }
  }

  assert!(deducted <= STOCK, "deducted {} from a stock of {}", deducted, STOCK);
  assert_eq!(store.stock_of(lamp.id), Some(STOCK - deducted));
  let recorded: u32 = store.all_orders().iter().map(|o| o.quantity).sum();
  assert_eq!(recorded, deducted);
}
