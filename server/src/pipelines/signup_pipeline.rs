// storefront/server/src/pipelines/signup_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::SignupCtxData;
use crate::services::auth_service::{self, MIN_PASSWORD_LEN};
use storefront::model::{NewUser, Role};
use storefront::{ContextData, Pipeline, PipelineControl, StoreError, Workflows};
use tracing::{event, info, warn, Level};

/// Registers the sign-up pipeline.
pub fn register_signup_pipeline(workflows: &Workflows<AppError>) {
  let mut signup_p = Pipeline::<SignupCtxData, AppError>::new(&[
    ("validate_signup_input", false),
    ("check_existing_user_signup", false),
    ("create_user_signup", false),
    ("issue_session_token_signup", false),
  ]);

  // Step 1: Required fields, email shape, password length.
  signup_p.on_root("validate_signup_input", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let (username, email, password_len) = {
        let guard = ctx_data.read();
        (guard.username.clone(), guard.email.clone(), guard.password.len())
      };

      event!(Level::DEBUG, %email, "Validating signup input.");
      if username.is_empty() || email.is_empty() || password_len == 0 {
        return Err(AppError::Validation("All fields are required".to_string()));
      }
      if !auth_service::is_valid_email(&email) {
        warn!("Invalid email format provided for signup.");
        return Err(AppError::Validation("Invalid email format".to_string()));
      }
      if password_len < MIN_PASSWORD_LEN {
        warn!(password_len, "Password too short for signup.");
        return Err(AppError::Validation(format!(
          "Password must be at least {} characters",
          MIN_PASSWORD_LEN
        )));
      }
      Ok(PipelineControl::Continue)
    })
  });

  // Step 2: The email must not be registered yet.
  signup_p.on_root("check_existing_user_signup", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let (email, identity) = {
        let guard = ctx_data.read();
        (guard.email.clone(), guard.app_state.identity.clone())
      };

      match identity.find_user_by_email(&email).await? {
        Some(_) => {
          warn!(%email, "Attempt to signup with existing email.");
          Err(AppError::Validation("User already exists".to_string()))
        }
        None => Ok(PipelineControl::Continue),
      }
    })
  });

  // Step 3: Hash the password and store the account as a Buyer.
  signup_p.on_root("create_user_signup", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let (new_user, password, identity) = {
        let guard = ctx_data.read();
        let new_user = NewUser {
          username: guard.username.clone(),
          email: guard.email.clone(),
          password_hash: String::new(),
          first_name: guard.first_name.clone(),
          last_name: guard.last_name.clone(),
          role: Role::Buyer,
        };
        (new_user, guard.password.clone(), guard.app_state.identity.clone())
      };

      let password_hash = auth_service::hash_password(&password)?;
      let new_user = NewUser { password_hash, ..new_user };

      match identity.create_user(new_user).await {
        Ok(user) => {
          info!(user_id = %user.id, "User created successfully.");
          ctx_data.write().created_user = Some(user);
          Ok(PipelineControl::Continue)
        }
        // Lost a race with a concurrent signup for the same email.
        Err(StoreError::Conflict(_)) => Err(AppError::Validation("User already exists".to_string())),
        Err(store_err) => Err(AppError::Store(store_err)),
      }
    })
  });

  // Step 4: Sign the new user in.
  signup_p.on_root("issue_session_token_signup", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let (user, sessions) = {
        let guard = ctx_data.read();
        (guard.created_user.clone(), guard.app_state.sessions.clone())
      };
      let user = user.ok_or_else(|| AppError::Internal("User missing when issuing a session token.".to_string()))?;

      let token = sessions.issue(&user);
      ctx_data.write().session_token = Some(token);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  workflows.register_pipeline(signup_p);
  tracing::info!("Sign-up pipeline registered.");
}
