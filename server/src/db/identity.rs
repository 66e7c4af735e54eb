// storefront/server/src/db/identity.rs

use super::rows::UserRow;
use super::{store_err, PgStore};
use async_trait::async_trait;
use storefront::model::{NewUser, User};
use storefront::{IdentityStore, StoreResult};
use tracing::instrument;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, role, created_at, updated_at";

#[async_trait]
impl IdentityStore for PgStore {
  #[instrument(name = "pg::find_user", skip(self))]
  async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
      .bind(id)
      .fetch_optional(self.pool())
      .await
      .map_err(store_err)?;
    row.map(User::try_from).transpose()
  }

  #[instrument(name = "pg::find_user_by_email", skip(self))]
  async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
      .bind(email)
      .fetch_optional(self.pool())
      .await
      .map_err(store_err)?;
    row.map(User::try_from).transpose()
  }

  #[instrument(name = "pg::create_user", skip(self, new_user), fields(email = %new_user.email))]
  async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
    let row: UserRow = sqlx::query_as(&format!(
      "INSERT INTO users (username, email, password_hash, first_name, last_name, role) \
       VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
      USER_COLUMNS
    ))
    .bind(&new_user.username)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .bind(&new_user.first_name)
    .bind(&new_user.last_name)
    .bind(new_user.role.as_str())
    .fetch_one(self.pool())
    .await
    .map_err(store_err)?;
    User::try_from(row)
  }
}
