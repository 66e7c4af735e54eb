// storefront/server/src/web/extractors.rs

use crate::errors::AppError;
use crate::services::session_service::Session;
use crate::state::AppState;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use storefront::model::Role;
use tracing::warn;

/// An authenticated caller holding the `Buyer` role.
///
/// Rejections: no bearer token is 401 "Access Token Required"; an unknown or
/// expired token is 403 "Invalid or expired token."; any other role is 403
/// "Access denied".
#[derive(Debug, Clone)]
pub struct BuyerPrincipal {
  pub session: Session,
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
  let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
  let mut parts = header.split_whitespace();
  match (parts.next(), parts.next()) {
    (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => Some(token),
    _ => None,
  }
}

fn authenticate(req: &HttpRequest) -> Result<BuyerPrincipal, AppError> {
  let token = bearer_token(req).ok_or_else(|| AppError::Auth("Access Token Required".to_string()))?;

  let app_state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;

  let session = app_state.sessions.resolve(token).ok_or_else(|| {
    warn!("Rejected unknown or expired session token.");
    AppError::Forbidden("Invalid or expired token.".to_string())
  })?;

  if session.role != Role::Buyer {
    warn!(user_id = %session.user_id, role = %session.role, "Non-buyer attempted an order route.");
    return Err(AppError::Forbidden("Access denied".to_string()));
  }
  Ok(BuyerPrincipal { session })
}

impl FromRequest for BuyerPrincipal {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    ready(authenticate(req))
  }
}
