// storefront/server/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use storefront::model::{parse_id, Product, ProductFilter};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize, Debug, Default)]
pub struct ListProductsQuery {
  pub category: Option<String>,
  pub sort: Option<String>,
  pub query: Option<String>,
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let filter = ProductFilter::new(
    query_params.category.as_deref(),
    query_params.query.as_deref(),
    query_params.sort.as_deref(),
  );

  let products: Vec<Product> = app_state.catalog.list_products(&filter).await?;
  info!("Successfully fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::list_categories", skip(app_state))]
pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = app_state.catalog.categories().await?;
  Ok(HttpResponse::Ok().json(categories))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product_id = parse_id(&path).ok_or_else(|| AppError::Validation("Invalid product ID".to_string()))?;

  match app_state.catalog.find_product(product_id).await? {
    Some(product) => Ok(HttpResponse::Ok().json(product)),
    None => {
      warn!(%product_id, "Product not found.");
      Err(AppError::NotFound("Product not found".to_string()))
    }
  }
}
