// storefront/server/src/db/rows.rs

//! Row shapes as stored, and their conversion into domain records.
//! Integers and enum columns are checked here; a row that does not fit the
//! domain is `StoreError::Corrupt`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use storefront::model::{Expanded, Order, OrderId, OrderView, Product, ProductSummary, User, UserSummary};
use storefront::StoreError;
use uuid::Uuid;

fn non_negative(what: &str, id: Uuid, value: i32) -> Result<u32, StoreError> {
  u32::try_from(value).map_err(|_| StoreError::Corrupt(format!("{} of {} is negative ({})", what, id, value)))
}

#[derive(Debug, FromRow)]
pub(crate) struct ProductRow {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub price: Decimal,
  pub stock: i32,
  pub category: Option<String>,
  pub image_url: Option<String>,
  pub status: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
  type Error = StoreError;

  fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
    Ok(Product {
      id: row.id,
      stock: non_negative("stock", row.id, row.stock)?,
      status: row.status.parse().map_err(StoreError::Corrupt)?,
      name: row.name,
      description: row.description,
      price: row.price,
      category: row.category,
      image_url: row.image_url,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
  pub id: Uuid,
  pub username: String,
  pub email: String,
  pub password_hash: String,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub role: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
  type Error = StoreError;

  fn try_from(row: UserRow) -> Result<Self, Self::Error> {
    Ok(User {
      id: row.id,
      role: row.role.parse().map_err(StoreError::Corrupt)?,
      username: row.username,
      email: row.email,
      password_hash: row.password_hash,
      first_name: row.first_name,
      last_name: row.last_name,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

#[derive(Debug, FromRow)]
pub(crate) struct OrderRow {
  pub id: Uuid,
  pub user_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub address: String,
  pub total_amount: Decimal,
  pub status: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
  type Error = StoreError;

  fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
    Ok(Order {
      id: OrderId::Durable(row.id),
      quantity: non_negative("quantity", row.id, row.quantity)?,
      status: row.status.parse().map_err(StoreError::Corrupt)?,
      user_id: row.user_id,
      product_id: row.product_id,
      address: row.address,
      total_amount: row.total_amount,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

/// An order joined with its product and user. The joined columns are NULL
/// when the referenced row no longer exists.
#[derive(Debug, FromRow)]
pub(crate) struct OrderListingRow {
  #[sqlx(flatten)]
  pub order: OrderRow,
  pub p_name: Option<String>,
  pub p_description: Option<String>,
  pub p_price: Option<Decimal>,
  pub p_category: Option<String>,
  pub p_image_url: Option<String>,
  pub u_username: Option<String>,
  pub u_email: Option<String>,
  pub u_first_name: Option<String>,
  pub u_last_name: Option<String>,
}

impl TryFrom<OrderListingRow> for OrderView {
  type Error = StoreError;

  fn try_from(row: OrderListingRow) -> Result<Self, Self::Error> {
    let order = Order::try_from(row.order)?;

    let product = match (row.p_name, row.p_description, row.p_price) {
      (Some(name), Some(description), Some(price)) => Some(ProductSummary {
        id: order.product_id,
        name,
        description,
        price,
        category: row.p_category,
        image_url: row.p_image_url,
      }),
      _ => None,
    };
    let user = match (row.u_username, row.u_email) {
      (Some(username), Some(email)) => Some(UserSummary {
        id: order.user_id,
        username,
        email,
        first_name: row.u_first_name,
        last_name: row.u_last_name,
      }),
      _ => None,
    };

    let mut view = OrderView::from(order);
    if let Some(summary) = product {
      view.product_id = Expanded::Summary(summary);
    }
    if let Some(summary) = user {
      view.user_id = Expanded::Summary(summary);
    }
    Ok(view)
  }
}
