//! Refresh session entity.
//!
//! One row per issued refresh token, keyed by the token's `jti` claim.
//! A user may hold several concurrent sessions; rotation replaces a
//! single row, so revoking one device leaves the others intact.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An active refresh token session.
#[derive(Debug, Clone)]
pub struct RefreshSession {
    /// Session id, equal to the refresh token's `jti` claim
    pub id: Uuid,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RefreshSession {
    /// A session past its expiry is treated as revoked even if the
    /// row still exists.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
