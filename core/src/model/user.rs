// storefront/core/src/model/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Capability attached to an account. Only `Buyer` may place or list orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
  #[default]
  Buyer,
  Admin,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Role::Buyer => "Buyer",
      Role::Admin => "Admin",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Role {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "Buyer" => Ok(Role::Buyer),
      "Admin" => Ok(Role::Admin),
      other => Err(format!("unknown role '{}'", other)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub id: Uuid,
  pub username: String,
  pub email: String,
  #[serde(skip_serializing, default)] // Never send password hash to client
  pub password_hash: String,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub role: Role,
  #[serde(rename = "createdAt")]
  pub created_at: DateTime<Utc>,
  #[serde(rename = "updatedAt")]
  pub updated_at: DateTime<Utc>,
}

impl User {
  pub fn summary(&self) -> UserSummary {
    UserSummary {
      id: self.id,
      username: self.username.clone(),
      email: self.email.clone(),
      first_name: self.first_name.clone(),
      last_name: self.last_name.clone(),
    }
  }
}

/// The user fields embedded in an expanded order listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
  pub id: Uuid,
  pub username: String,
  pub email: String,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
}

/// A validated signup, ready to be stored. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username: String,
  pub email: String,
  pub password_hash: String,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub role: Role,
}
