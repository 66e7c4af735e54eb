// storefront/server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use storefront::{ListingSource, PlaceOrderRequest, Placement};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::BuyerPrincipal;

/// Response header telling the client which path recorded the order.
pub const DURABILITY_HEADER: &str = "X-Order-Durability";

#[instrument(
  name = "handler::place_order",
  skip(app_state, principal, req_payload),
  fields(caller = %principal.session.user_id)
)]
pub async fn place_order_handler(
  principal: BuyerPrincipal,
  app_state: web::Data<AppState>,
  req_payload: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
  let placement = app_state.placement.place_order(req_payload.into_inner()).await?;

  let (durability, order) = match placement {
    Placement::Durable(order) => ("durable", order),
    Placement::Fallback(order) => {
      warn!(order_id = %order.id, "Order accepted in degraded mode.");
      ("fallback", order)
    }
  };
  info!(order_id = %order.id, durability, "Order placed.");

  Ok(
    HttpResponse::Created()
      .insert_header((DURABILITY_HEADER, durability))
      .json(order),
  )
}

#[instrument(name = "handler::list_orders", skip(app_state, principal, path), fields(caller = %principal.session.user_id))]
pub async fn list_orders_handler(
  principal: BuyerPrincipal,
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let listing = app_state.placement.list_orders_for_user(&path.into_inner()).await?;

  let durability = match listing.source {
    ListingSource::Durable => "durable",
    ListingSource::Fallback => "fallback",
  };
  info!(count = listing.orders.len(), durability, "Orders listed.");

  Ok(
    HttpResponse::Ok()
      .insert_header((DURABILITY_HEADER, durability))
      .json(listing.orders),
  )
}
