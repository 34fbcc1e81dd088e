//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A login session.
///
/// Created on login and referenced by the refresh token through its `id`.
/// A session is never deleted; logout and revocation set `revoked_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// The account this session belongs to.
    pub account_id: Uuid,
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,
    /// When the session was last updated.
    pub updated_at: DateTime<Utc>,
    /// When the session expires (absolute timeout).
    pub expires_at: DateTime<Utc>,
    /// When the session was revoked, if it was.
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Classify the session at the given instant.
    ///
    /// Revocation wins over expiry. A session whose `expires_at` equals
    /// `now` is already expired.
    pub fn status_at(&self, now: DateTime<Utc>) -> SessionStatus {
        if self.revoked_at.is_some() {
            SessionStatus::Revoked
        } else if now >= self.expires_at {
            SessionStatus::Expired
        } else {
            SessionStatus::Active
        }
    }

    /// Check whether the session can still be used to refresh.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status_at(now) == SessionStatus::Active
    }
}

/// Derived lifecycle state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Usable for refresh.
    Active,
    /// Past `expires_at`.
    Expired,
    /// Ended by logout or revocation.
    Revoked,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
        };
        write!(f, "{s}")
    }
}

/// Data required to create a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
    /// The account this session belongs to.
    pub account_id: Uuid,
    /// Creation instant, taken from the service clock.
    pub created_at: DateTime<Utc>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}
