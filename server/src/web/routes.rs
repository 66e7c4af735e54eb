// storefront/server/src/web/routes.rs

use crate::errors::AppError;
use crate::web::handlers::{auth_handlers, order_handlers, product_handlers};
use actix_web::{error::JsonPayloadError, web, HttpRequest};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Malformed JSON bodies get the same `{"error": ...}` shape as every other failure.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  tracing::warn!(error = %err, "Rejected request body.");
  AppError::Validation(format!("Invalid request body: {}", err)).into()
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::scope("/auth")
        .route("/signup", web::post().to(auth_handlers::signup_handler))
        .route("/login", web::post().to(auth_handlers::signin_handler)),
    )
    .service(
      web::scope("/products")
        .route("", web::get().to(product_handlers::list_products_handler))
        .route("/categories", web::get().to(product_handlers::list_categories_handler))
        .route("/{product_id}", web::get().to(product_handlers::get_product_handler)),
    )
    .service(
      web::scope("/orders")
        .route("", web::post().to(order_handlers::place_order_handler))
        .route("/{user_id}", web::get().to(order_handlers::list_orders_handler)),
    );
}
