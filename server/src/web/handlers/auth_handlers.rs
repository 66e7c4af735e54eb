// storefront/server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use storefront::model::{Role, User};
use storefront::{ContextData, PipelineResult};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::pipelines::contexts::{SigninCtxData, SignupCtxData};
use crate::state::AppState;

// --- Request DTOs ---
// Every field is optional so a missing one is a validation error, not a
// body-parse error.
#[derive(Deserialize, Debug, Default)]
pub struct SignupRequestPayload {
  pub username: Option<String>,
  pub email: Option<String>,
  pub password: Option<String>,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct SigninRequestPayload {
  pub email: Option<String>,
  pub password: Option<String>,
}

/// The account fields returned by signup and login.
#[derive(Serialize, Debug)]
pub struct AccountView {
  pub id: Uuid,
  pub username: String,
  pub email: String,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub role: Role,
}

impl From<&User> for AccountView {
  fn from(user: &User) -> Self {
    Self {
      id: user.id,
      username: user.username.clone(),
      email: user.email.clone(),
      first_name: user.first_name.clone(),
      last_name: user.last_name.clone(),
      role: user.role,
    }
  }
}

fn trimmed(value: &Option<String>) -> String {
  value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn trimmed_opt(value: &Option<String>) -> Option<String> {
  value.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

// --- Handler Implementations ---

#[instrument(name = "handler::signup", skip(app_state, req_payload), fields(req_email = ?req_payload.email))]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SignupRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let signup_ctx_initial = SignupCtxData {
    app_state: app_state.get_ref().clone(),
    username: trimmed(&req_payload.username),
    email: trimmed(&req_payload.email),
    password: req_payload.password.clone().unwrap_or_default(),
    first_name: trimmed_opt(&req_payload.first_name),
    last_name: trimmed_opt(&req_payload.last_name),
    created_user: None,
    session_token: None,
  };
  let ctx_data = ContextData::new(signup_ctx_initial);

  match app_state.workflows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let guard = ctx_data.read();
      let user = guard
        .created_user
        .as_ref()
        .ok_or_else(|| AppError::Internal("Signup completed without creating a user.".to_string()))?;
      let token = guard
        .session_token
        .clone()
        .ok_or_else(|| AppError::Internal("Signup completed without a session token.".to_string()))?;

      info!(user_id = %user.id, "Signup successful.");
      Ok(HttpResponse::Created().json(json!({
          "message": "Signup successful",
          "user": AccountView::from(user),
          "token": token,
      })))
    }
    PipelineResult::Stopped => {
      warn!("Signup pipeline was stopped by a handler.");
      Err(AppError::Internal("Signup pipeline stopped before completion.".to_string()))
    }
  }
}

#[instrument(name = "handler::signin", skip(app_state, req_payload), fields(req_email = ?req_payload.email))]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SigninRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let signin_ctx_initial = SigninCtxData {
    app_state: app_state.get_ref().clone(),
    email: trimmed(&req_payload.email),
    password: req_payload.password.clone().unwrap_or_default(),
    user: None,
    session_token: None,
  };
  let ctx_data = ContextData::new(signin_ctx_initial);

  match app_state.workflows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let guard = ctx_data.read();
      let user = guard
        .user
        .as_ref()
        .ok_or_else(|| AppError::Internal("Signin completed without user identification.".to_string()))?;
      let token = guard
        .session_token
        .clone()
        .ok_or_else(|| AppError::Internal("Signin completed without a session token.".to_string()))?;

      info!(user_id = %user.id, "Signin successful.");
      Ok(HttpResponse::Ok().json(json!({
          "message": "Login successful",
          "user": AccountView::from(user),
          "token": token,
      })))
    }
    PipelineResult::Stopped => {
      warn!("Signin pipeline was stopped by a handler.");
      Err(AppError::Internal("Signin pipeline stopped before completion.".to_string()))
    }
  }
}
