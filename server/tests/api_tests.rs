// storefront/server/tests/api_tests.rs

use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::Arc;
use storefront::model::{Product, ProductStatus, Role, User};
use storefront::{FallbackStore, MemoryStore};
use storefront_server::web::configure_app_routes;
use storefront_server::web::handlers::order_handlers::DURABILITY_HEADER;
use storefront_server::{AppConfig, AppState, Stores};
use uuid::Uuid;

macro_rules! test_app {
  ($state:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($state.clone()))
        .configure(configure_app_routes),
    )
    .await
  };
}

struct Fixture {
  store: MemoryStore,
  state: AppState,
}

impl Fixture {
  fn new() -> Self {
    let store = MemoryStore::new();
    let state = AppState::new(
      Arc::new(AppConfig::for_tests()),
      Stores::from_backend(store.clone()),
      Arc::new(FallbackStore::new(10)),
    );
    Self { store, state }
  }

  fn user(&self, username: &str, role: Role) -> User {
    let now = Utc::now();
    let user = User {
      id: Uuid::new_v4(),
      username: username.to_string(),
      email: format!("{}@example.com", username),
      password_hash: String::new(),
      first_name: None,
      last_name: None,
      role,
      created_at: now,
      updated_at: now,
    };
    self.store.insert_user(user.clone());
    user
  }

  fn token_for(&self, user: &User) -> String {
    self.state.sessions.issue(user)
  }

  fn product(&self, name: &str, category: &str, price: Decimal, stock: u32) -> Product {
    let now = Utc::now();
    let product = Product {
      id: Uuid::new_v4(),
      name: name.to_string(),
      description: format!("{} description", name),
      price,
      stock,
      category: Some(category.to_string()),
      image_url: None,
      status: ProductStatus::Active,
      created_at: now,
      updated_at: now,
    };
    self.store.insert_product(product.clone());
    product
  }
}

fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
  (AUTHORIZATION, format!("Bearer {}", token))
}

#[actix_web::test]
async fn test_health() {
  let fx = Fixture::new();
  let app = test_app!(fx.state);

  let req = test::TestRequest::get().uri("/health").to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;

  assert_eq!(body, json!({"status": "ok"}));
}

#[actix_web::test]
async fn test_order_within_stock_is_created_durably() {
  let fx = Fixture::new();
  let buyer = fx.user("alice", Role::Buyer);
  let lamp = fx.product("Lamp", "Lighting", Decimal::new(1000, 2), 5);
  let app = test_app!(fx.state);

  let req = test::TestRequest::post()
    .uri("/orders")
    .insert_header(bearer(&fx.token_for(&buyer)))
    .set_json(json!({
      "userId": buyer.id.to_string(),
      "productId": lamp.id.to_string(),
      "quantity": 3,
      "address": "1 Main St"
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::CREATED);
  assert_eq!(resp.headers().get(DURABILITY_HEADER).unwrap(), "durable");
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["totalAmount"].as_f64(), Some(30.0));
  assert_eq!(body["quantity"], 3);
  assert_eq!(body["status"], "pending");
  assert_eq!(fx.store.stock_of(lamp.id), Some(2));
}

#[actix_web::test]
async fn test_insufficient_stock_reports_available() {
  let fx = Fixture::new();
  let buyer = fx.user("bob", Role::Buyer);
  let lamp = fx.product("Lamp", "Lighting", Decimal::new(1000, 2), 5);
  let app = test_app!(fx.state);

  let req = test::TestRequest::post()
    .uri("/orders")
    .insert_header(bearer(&fx.token_for(&buyer)))
    .set_json(json!({
      "userId": buyer.id.to_string(),
      "productId": lamp.id.to_string(),
      "quantity": 9,
      "address": "1 Main St"
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({"error": "Insufficient stock", "availableStock": 5}));
  assert_eq!(fx.store.stock_of(lamp.id), Some(5));
}

fn order_request(user_id: &str, product_id: &str, quantity: u32) -> serde_json::Value {
  json!({
    "userId": user_id,
    "productId": product_id,
    "quantity": quantity,
    "address": "1 Main St"
  })
}

#[actix_web::test]
async fn test_unknown_buyer_is_not_found() {
  let fx = Fixture::new();
  let caller = fx.user("ivan", Role::Buyer);
  let lamp = fx.product("Lamp", "Lighting", Decimal::new(1000, 2), 5);
  let app = test_app!(fx.state);

  let req = test::TestRequest::post()
    .uri("/orders")
    .insert_header(bearer(&fx.token_for(&caller)))
    .set_json(order_request(&Uuid::new_v4().to_string(), &lamp.id.to_string(), 1))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({"error": "User not found"}));
  assert_eq!(fx.store.stock_of(lamp.id), Some(5));
}

#[actix_web::test]
async fn test_stock_write_failure_is_a_server_error() {
  let fx = Fixture::new();
  let buyer = fx.user("judy", Role::Buyer);
  let lamp = fx.product("Lamp", "Lighting", Decimal::new(1000, 2), 5);
  fx.store.set_stock_writes_available(false);
  let app = test_app!(fx.state);

  let req = test::TestRequest::post()
    .uri("/orders")
    .insert_header(bearer(&fx.token_for(&buyer)))
    .set_json(order_request(&buyer.id.to_string(), &lamp.id.to_string(), 2))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({"error": "Server error while updating stock"}));
  assert_eq!(fx.store.stock_of(lamp.id), Some(5));
  assert!(fx.store.all_orders().is_empty());
  assert_eq!(fx.state.placement.fallback().pending_len(), 0);
}

#[actix_web::test]
async fn test_identity_outage_hides_internal_details() {
  let fx = Fixture::new();
  let buyer = fx.user("ken", Role::Buyer);
  let lamp = fx.product("Lamp", "Lighting", Decimal::new(1000, 2), 5);
  fx.store.set_identity_available(false);
  let app = test_app!(fx.state);

  let req = test::TestRequest::post()
    .uri("/orders")
    .insert_header(bearer(&fx.token_for(&buyer)))
    .set_json(order_request(&buyer.id.to_string(), &lamp.id.to_string(), 1))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({"error": "Server error"}));
  assert_eq!(fx.store.stock_of(lamp.id), Some(5));
}

#[actix_web::test]
async fn test_unknown_product_echoes_requested_id() {
  let fx = Fixture::new();
  let buyer = fx.user("carol", Role::Buyer);
  let app = test_app!(fx.state);
  let missing = Uuid::new_v4().to_string();

  let req = test::TestRequest::post()
    .uri("/orders")
    .insert_header(bearer(&fx.token_for(&buyer)))
    .set_json(json!({
      "userId": buyer.id.to_string(),
      "productId": missing,
      "quantity": 1,
      "address": "1 Main St"
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({"error": "Product not found", "idRequested": missing}));
}

#[actix_web::test]
async fn test_ledger_outage_still_creates_order_and_lists_it() {
  let fx = Fixture::new();
  let buyer = fx.user("dave", Role::Buyer);
  let lamp = fx.product("Lamp", "Lighting", Decimal::new(1000, 2), 5);
  let token = fx.token_for(&buyer);
  fx.store.set_ledger_available(false);
  let app = test_app!(fx.state);

  let req = test::TestRequest::post()
    .uri("/orders")
    .insert_header(bearer(&token))
    .set_json(json!({
      "userId": buyer.id.to_string(),
      "productId": lamp.id.to_string(),
      "quantity": 2,
      "address": "1 Main St"
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::CREATED);
  assert_eq!(resp.headers().get(DURABILITY_HEADER).unwrap(), "fallback");
  let created: Value = test::read_body_json(resp).await;
  let order_id = created["id"].as_str().unwrap().to_string();
  assert!(order_id.starts_with("fallback-"));

  let req = test::TestRequest::get()
    .uri(&format!("/orders/{}", buyer.id))
    .insert_header(bearer(&token))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(resp.headers().get(DURABILITY_HEADER).unwrap(), "fallback");
  let listed: Value = test::read_body_json(resp).await;
  let listed = listed.as_array().unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0]["id"], order_id.as_str());
  assert_eq!(listed[0]["productId"], lamp.id.to_string());
}

#[actix_web::test]
async fn test_durable_listing_expands_product_and_user() {
  let fx = Fixture::new();
  let buyer = fx.user("erin", Role::Buyer);
  let lamp = fx.product("Lamp", "Lighting", Decimal::new(1000, 2), 5);
  let token = fx.token_for(&buyer);
  let app = test_app!(fx.state);

  let req = test::TestRequest::post()
    .uri("/orders")
    .insert_header(bearer(&token))
    .set_json(json!({
      "userId": buyer.id.to_string(),
      "productId": lamp.id.to_string(),
      "quantity": 1,
      "address": "1 Main St"
    }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

  let req = test::TestRequest::get()
    .uri(&format!("/orders/{}", buyer.id))
    .insert_header(bearer(&token))
    .to_request();
  let listed: Value = test::call_and_read_body_json(&app, req).await;

  assert_eq!(listed[0]["productId"]["name"], "Lamp");
  assert_eq!(listed[0]["userId"]["username"], "erin");
}

#[actix_web::test]
async fn test_validation_failures_are_bad_requests() {
  let fx = Fixture::new();
  let buyer = fx.user("frank", Role::Buyer);
  let token = fx.token_for(&buyer);
  let app = test_app!(fx.state);

  let bodies = vec![
    json!({ "productId": Uuid::new_v4().to_string(), "quantity": 1, "address": "x" }),
    json!({ "userId": "nope", "productId": Uuid::new_v4().to_string(), "quantity": 1, "address": "x" }),
    json!({ "userId": buyer.id.to_string(), "productId": Uuid::new_v4().to_string(), "quantity": 0, "address": "x" }),
    json!({ "userId": buyer.id.to_string(), "productId": Uuid::new_v4().to_string(), "quantity": "2", "address": "x" }),
  ];
  for body in bodies {
    let req = test::TestRequest::post()
      .uri("/orders")
      .insert_header(bearer(&token))
      .set_json(&body)
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {}", body);
    let err: Value = test::read_body_json(resp).await;
    assert!(err["error"].is_string());
  }
  assert_eq!(fx.store.lookup_count(), 0);
}

#[actix_web::test]
async fn test_malformed_json_is_a_bad_request() {
  let fx = Fixture::new();
  let buyer = fx.user("gina", Role::Buyer);
  let app = test_app!(fx.state);

  let req = test::TestRequest::post()
    .uri("/orders")
    .insert_header(bearer(&fx.token_for(&buyer)))
    .insert_header(("content-type", "application/json"))
    .set_payload("{not json")
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let err: Value = test::read_body_json(resp).await;
  assert!(err["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[actix_web::test]
async fn test_order_routes_require_buyer_token() {
  let fx = Fixture::new();
  let admin = fx.user("root", Role::Admin);
  let admin_token = fx.token_for(&admin);
  let app = test_app!(fx.state);
  let path = format!("/orders/{}", Uuid::new_v4());

  let req = test::TestRequest::get().uri(&path).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Access Token Required");

  let req = test::TestRequest::get().uri(&path).insert_header(bearer("bogus")).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Invalid or expired token.");

  let req = test::TestRequest::get().uri(&path).insert_header(bearer(&admin_token)).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Access denied");
}

#[actix_web::test]
async fn test_signup_then_login() {
  let fx = Fixture::new();
  let app = test_app!(fx.state);

  let req = test::TestRequest::post()
    .uri("/auth/signup")
    .set_json(json!({
      "username": "helen",
      "email": "helen@example.com",
      "password": "secret1",
      "first_name": "Helen"
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["user"]["role"], "Buyer");
  assert_eq!(body["user"]["first_name"], "Helen");
  assert!(body["user"].get("password_hash").is_none());
  let signup_token = body["token"].as_str().unwrap().to_string();
  assert!(fx.state.sessions.resolve(&signup_token).is_some());

  let req = test::TestRequest::post()
    .uri("/auth/signup")
    .set_json(json!({ "username": "helen2", "email": "helen@example.com", "password": "secret1" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "User already exists");

  let req = test::TestRequest::post()
    .uri("/auth/login")
    .set_json(json!({ "email": "helen@example.com", "password": "secret1" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["user"]["username"], "helen");
  assert!(body["token"].is_string());

  let req = test::TestRequest::post()
    .uri("/auth/login")
    .set_json(json!({ "email": "helen@example.com", "password": "wrong-pass" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Invalid email or password");
}

#[actix_web::test]
async fn test_signup_rejects_bad_input() {
  let fx = Fixture::new();
  let app = test_app!(fx.state);

  let cases = vec![
    (json!({ "email": "a@b.co", "password": "secret1" }), "All fields are required"),
    (json!({ "username": "x", "email": "not-an-email", "password": "secret1" }), "Invalid email format"),
    (json!({ "username": "x", "email": "x@b.co", "password": "123" }), "Password must be at least 6 characters"),
  ];
  for (body, expected) in cases {
    let req = test::TestRequest::post().uri("/auth/signup").set_json(&body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = test::read_body_json(resp).await;
    assert_eq!(err["error"], expected);
  }
}

#[actix_web::test]
async fn test_catalog_routes() {
  let fx = Fixture::new();
  let cheap = fx.product("Candle", "home", Decimal::new(300, 2), 10);
  fx.product("Armchair", "Furniture", Decimal::new(25000, 2), 2);
  fx.product("Blanket", "Home", Decimal::new(4000, 2), 7);
  let app = test_app!(fx.state);

  let req = test::TestRequest::get().uri("/products").to_request();
  let all: Value = test::call_and_read_body_json(&app, req).await;
  let names: Vec<&str> = all.as_array().unwrap().iter().map(|p| p["name"].as_str().unwrap()).collect();
  assert_eq!(names, vec!["Armchair", "Blanket", "Candle"]);

  let req = test::TestRequest::get().uri("/products?category=HOME&sort=price_asc").to_request();
  let home: Value = test::call_and_read_body_json(&app, req).await;
  let names: Vec<&str> = home.as_array().unwrap().iter().map(|p| p["name"].as_str().unwrap()).collect();
  assert_eq!(names, vec!["Candle", "Blanket"]);

  let req = test::TestRequest::get().uri("/products?query=ARM").to_request();
  let found: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(found.as_array().unwrap().len(), 1);

  let req = test::TestRequest::get().uri("/products/categories").to_request();
  let categories: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(categories, json!(["Furniture", "Home", "home"]));

  let req = test::TestRequest::get().uri(&format!("/products/{}", cheap.id)).to_request();
  let product: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(product["name"], "Candle");

  let req = test::TestRequest::get().uri("/products/xyz").to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

  let req = test::TestRequest::get().uri(&format!("/products/{}", Uuid::new_v4())).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}
