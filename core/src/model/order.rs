// storefront/core/src/model/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ids::OrderId;
use super::product::ProductSummary;
use super::user::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  #[default]
  Pending,
  Paid,
  Shipped,
  Completed,
}

impl OrderStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Paid => "paid",
      OrderStatus::Shipped => "shipped",
      OrderStatus::Completed => "completed",
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(OrderStatus::Pending),
      "paid" => Ok(OrderStatus::Paid),
      "shipped" => Ok(OrderStatus::Shipped),
      "completed" => Ok(OrderStatus::Completed),
      other => Err(format!("unknown order status '{}'", other)),
    }
  }
}

/// An order about to be written. The writer (ledger or fallback store)
/// assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
  pub user_id: Uuid,
  pub product_id: Uuid,
  pub quantity: u32,
  pub address: String,
  /// Always `unit price * quantity` from the catalog, never from the caller.
  pub total_amount: Decimal,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
}

impl NewOrder {
  /// Assigns `id` and stamps `updated_at` with the creation time.
  pub fn into_order(self, id: OrderId) -> Order {
    Order {
      id,
      user_id: self.user_id,
      product_id: self.product_id,
      quantity: self.quantity,
      address: self.address,
      total_amount: self.total_amount,
      status: self.status,
      created_at: self.created_at,
      updated_at: self.created_at,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: OrderId,
  pub user_id: Uuid,
  pub product_id: Uuid,
  pub quantity: u32,
  pub address: String,
  pub total_amount: Decimal,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Order {
  /// The write payload for this order, keeping its timestamps and status.
  /// Used when a fallback order is moved into the durable ledger.
  pub fn to_new_order(&self) -> NewOrder {
    NewOrder {
      user_id: self.user_id,
      product_id: self.product_id,
      quantity: self.quantity,
      address: self.address.clone(),
      total_amount: self.total_amount,
      status: self.status,
      created_at: self.created_at,
    }
  }
}

/// A reference that is either expanded into a summary or left as a raw id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expanded<T> {
  Summary(T),
  Id(Uuid),
}

impl<T> Expanded<T> {
  pub fn summary(&self) -> Option<&T> {
    match self {
      Expanded::Summary(s) => Some(s),
      Expanded::Id(_) => None,
    }
  }
}

/// An order as returned by a listing. On the durable path `product_id` and
/// `user_id` are expanded when the referenced record still exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
  pub id: OrderId,
  pub user_id: Expanded<UserSummary>,
  pub product_id: Expanded<ProductSummary>,
  pub quantity: u32,
  pub address: String,
  pub total_amount: Decimal,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderView {
  /// The unexpanded view, as served from the fallback store.
  fn from(order: Order) -> Self {
    OrderView {
      id: order.id,
      user_id: Expanded::Id(order.user_id),
      product_id: Expanded::Id(order.product_id),
      quantity: order.quantity,
      address: order.address,
      total_amount: order.total_amount,
      status: order.status,
      created_at: order.created_at,
      updated_at: order.updated_at,
    }
  }
}
