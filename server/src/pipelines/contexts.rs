// storefront/server/src/pipelines/contexts.rs

//! Data threaded through the auth pipelines. Handlers receive these wrapped
//! in `storefront::ContextData`.

use crate::state::AppState;
use storefront::model::User;

#[derive(Clone)]
pub struct SignupCtxData {
  pub app_state: AppState,
  pub username: String,
  pub email: String,
  pub password: String,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub created_user: Option<User>,
  pub session_token: Option<String>,
}

#[derive(Clone)]
pub struct SigninCtxData {
  pub app_state: AppState,
  pub email: String,
  pub password: String,
  pub user: Option<User>,
  pub session_token: Option<String>,
}
