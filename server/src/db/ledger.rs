// storefront/server/src/db/ledger.rs

use super::rows::{OrderListingRow, OrderRow};
use super::{store_err, PgStore};
use async_trait::async_trait;
use storefront::model::{NewOrder, Order, OrderView};
use storefront::{OrderLedger, StoreError, StoreResult};
use tracing::instrument;
use uuid::Uuid;

#[async_trait]
impl OrderLedger for PgStore {
  #[instrument(name = "pg::insert_order", skip(self, order), fields(user_id = %order.user_id, product_id = %order.product_id))]
  async fn insert_order(&self, order: NewOrder) -> StoreResult<Order> {
    let quantity = i32::try_from(order.quantity)
      .map_err(|_| StoreError::Conflict(format!("quantity {} exceeds the column range", order.quantity)))?;
    let row: OrderRow = sqlx::query_as(
      "INSERT INTO orders (user_id, product_id, quantity, address, total_amount, status, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $7) \
       RETURNING id, user_id, product_id, quantity, address, total_amount, status, created_at, updated_at",
    )
    .bind(order.user_id)
    .bind(order.product_id)
    .bind(quantity)
    .bind(&order.address)
    .bind(order.total_amount)
    .bind(order.status.as_str())
    .bind(order.created_at)
    .fetch_one(self.pool())
    .await
    .map_err(store_err)?;
    Order::try_from(row)
  }

  #[instrument(name = "pg::orders_for_user", skip(self))]
  async fn orders_for_user(&self, user_id: Uuid) -> StoreResult<Vec<OrderView>> {
    let rows: Vec<OrderListingRow> = sqlx::query_as(
      "SELECT o.id, o.user_id, o.product_id, o.quantity, o.address, o.total_amount, o.status, \
              o.created_at, o.updated_at, \
              p.name AS p_name, p.description AS p_description, p.price AS p_price, \
              p.category AS p_category, p.image_url AS p_image_url, \
              u.username AS u_username, u.email AS u_email, \
              u.first_name AS u_first_name, u.last_name AS u_last_name \
       FROM orders o \
       LEFT JOIN products p ON p.id = o.product_id \
       LEFT JOIN users u ON u.id = o.user_id \
       WHERE o.user_id = $1 \
       ORDER BY o.created_at ASC",
    )
    .bind(user_id)
    .fetch_all(self.pool())
    .await
    .map_err(store_err)?;
    rows.into_iter().map(OrderView::try_from).collect()
  }
}
