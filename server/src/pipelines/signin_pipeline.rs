// storefront/server/src/pipelines/signin_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::SigninCtxData;
use crate::services::auth_service;
use storefront::{ContextData, Pipeline, PipelineControl, Workflows};
use tracing::{event, warn, Level};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Registers the sign-in pipeline.
pub fn register_signin_pipeline(workflows: &Workflows<AppError>) {
  let mut signin_p = Pipeline::<SigninCtxData, AppError>::new(&[
    ("validate_signin_input", false),
    ("fetch_user_by_email_signin", false),
    ("verify_user_password_signin", false),
    ("issue_session_token_signin", false),
  ]);

  // Step 1: Validate input
  signin_p.on_root("validate_signin_input", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let (email, password_is_empty) = {
        let guard = ctx_data.read();
        (guard.email.clone(), guard.password.is_empty())
      };

      event!(Level::DEBUG, %email, "Validating sign-in input.");
      if email.is_empty() || password_is_empty {
        return Err(AppError::Validation("Email and password are required".to_string()));
      }
      if !auth_service::is_valid_email(&email) {
        warn!("Invalid email format provided for sign-in.");
        return Err(AppError::Validation("Invalid email format".to_string()));
      }
      Ok(PipelineControl::Continue)
    })
  });

  // Step 2: Fetch user by email
  signin_p.on_root("fetch_user_by_email_signin", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let (email, identity) = {
        let guard = ctx_data.read();
        (guard.email.clone(), guard.app_state.identity.clone())
      };

      match identity.find_user_by_email(&email).await? {
        Some(user) => {
          event!(Level::INFO, user_id = %user.id, "User found for signin.");
          ctx_data.write().user = Some(user);
          Ok(PipelineControl::Continue)
        }
        None => {
          warn!(%email, "User not found for email during signin.");
          Err(AppError::Validation(INVALID_CREDENTIALS.to_string()))
        }
      }
    })
  });

  // Step 3: Verify password
  signin_p.on_root("verify_user_password_signin", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let (stored_hash, password, user_id) = {
        let guard = ctx_data.read();
        let user = guard
          .user
          .as_ref()
          .ok_or_else(|| AppError::Internal("User missing for password verification.".to_string()))?;
        (user.password_hash.clone(), guard.password.clone(), user.id)
      };

      if auth_service::verify_password(&stored_hash, &password)? {
        event!(Level::INFO, %user_id, "Password verified successfully for signin.");
        Ok(PipelineControl::Continue)
      } else {
        warn!(%user_id, "Password mismatch during signin.");
        Err(AppError::Validation(INVALID_CREDENTIALS.to_string()))
      }
    })
  });

  // Step 4: Issue session token
  signin_p.on_root("issue_session_token_signin", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let (user, sessions) = {
        let guard = ctx_data.read();
        (guard.user.clone(), guard.app_state.sessions.clone())
      };
      let user = user.ok_or_else(|| AppError::Internal("User missing when issuing a session token.".to_string()))?;

      let token = sessions.issue(&user);
      ctx_data.write().session_token = Some(token);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  workflows.register_pipeline(signin_p);
  tracing::info!("Sign-in pipeline registered.");
}
