// storefront/core/src/model/ids.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Parses an identifier in the durable store's format (a UUID).
///
/// Surrounding whitespace is ignored; anything else that is not a UUID is
/// rejected.
pub fn parse_id(raw: &str) -> Option<Uuid> {
  Uuid::parse_str(raw.trim()).ok()
}

/// Identity of an order record.
///
/// Durable records carry the ledger's UUID. Records accepted while the ledger
/// was unavailable carry a synthetic, time-based id (`fallback-<millis>-<seq>`).
/// Both serialize as a plain string. A fallback id is provisional: once the
/// order is reconciled into the ledger it is stored under a new durable id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderId {
  Durable(Uuid),
  Fallback(String),
}

impl OrderId {
  pub const FALLBACK_PREFIX: &'static str = "fallback-";

  pub fn is_fallback(&self) -> bool {
    matches!(self, OrderId::Fallback(_))
  }
}

impl fmt::Display for OrderId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OrderId::Durable(id) => write!(f, "{}", id),
      OrderId::Fallback(id) => f.write_str(id),
    }
  }
}
