// storefront/server/src/services/session_service.rs

//! Opaque bearer tokens held in process memory with a fixed TTL.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::RwLock;
use rand_core::{OsRng, RngCore};
use std::collections::HashMap;
use std::time::Duration;
use storefront::model::{Role, User};
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub user_id: Uuid,
  pub username: String,
  pub role: Role,
  pub expires_at: DateTime<Utc>,
}

pub struct SessionRegistry {
  ttl: ChronoDuration,
  sessions: RwLock<HashMap<String, Session>>,
}

impl SessionRegistry {
  pub fn new(ttl: Duration) -> Self {
    Self {
      ttl: ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::hours(1)),
      sessions: RwLock::new(HashMap::new()),
    }
  }

  /// Issues a fresh 256-bit token for `user`.
  #[instrument(name = "sessions::issue", skip(self, user), fields(user_id = %user.id))]
  pub fn issue(&self, user: &User) -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    let token: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();

    let session = Session {
      user_id: user.id,
      username: user.username.clone(),
      role: user.role,
      expires_at: Utc::now() + self.ttl,
    };
    let mut sessions = self.sessions.write();
    sessions.retain(|_, s| s.expires_at > Utc::now());
    sessions.insert(token.clone(), session);
    debug!(active = sessions.len(), "Session issued.");
    token
  }

  /// The live session for `token`. Expired sessions are dropped on access.
  pub fn resolve(&self, token: &str) -> Option<Session> {
    let session = self.sessions.read().get(token).cloned()?;
    if session.expires_at <= Utc::now() {
      self.sessions.write().remove(token);
      return None;
    }
    Some(session)
  }
}
