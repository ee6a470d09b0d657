//! In-process session tracking
//!
//! Keeps the refresh tokens that are still redeemable and the ids of access
//! tokens revoked by logout. Both maps are keyed by token `jti`; nothing is
//! persisted, so a restart invalidates every refresh token.

use chrono::Utc;
use dashmap::DashMap;
use sala_core::UserId;

/// Stored refresh token data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSession {
    /// User ID this token belongs to
    pub user_id: UserId,
    /// Token creation timestamp (Unix epoch seconds)
    pub created_at: i64,
    /// Token expiry (Unix epoch seconds)
    pub expires_at: i64,
}

impl RefreshSession {
    pub fn new(user_id: UserId, expires_at: i64) -> Self {
        Self {
            user_id,
            created_at: Utc::now().timestamp(),
            expires_at,
        }
    }

    fn is_expired(&self, now: i64) -> bool {
        now > self.expires_at
    }
}

/// Refresh sessions and revoked access tokens
#[derive(Debug, Default)]
pub struct SessionStore {
    refresh: DashMap<String, RefreshSession>,
    revoked: DashMap<String, i64>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a refresh token, dropping sessions that have already expired
    pub fn store_refresh(&self, jti: &str, session: RefreshSession) {
        self.purge_expired();
        tracing::debug!(user_id = %session.user_id, "Stored refresh token");
        self.refresh.insert(jti.to_string(), session);
    }

    /// Consume a refresh token, returning its session if it was still valid
    ///
    /// Removal is atomic, so two concurrent refreshes with the same token
    /// cannot both succeed.
    pub fn take_refresh(&self, jti: &str) -> Option<RefreshSession> {
        let (_, session) = self.refresh.remove(jti)?;
        (!session.is_expired(Utc::now().timestamp())).then_some(session)
    }

    /// Revoke (delete) a refresh token
    pub fn revoke_refresh(&self, jti: &str) -> bool {
        let removed = self.refresh.remove(jti).is_some();
        if removed {
            tracing::debug!("Revoked refresh token");
        }
        removed
    }

    /// Revoke all refresh tokens for a user (logout from all devices)
    pub fn revoke_all_for_user(&self, user_id: UserId) -> usize {
        let before = self.refresh.len();
        self.refresh.retain(|_, session| session.user_id != user_id);
        let revoked = before.saturating_sub(self.refresh.len());
        tracing::debug!(user_id = %user_id, revoked, "Revoked refresh tokens for user");
        revoked
    }

    /// Number of live refresh sessions for a user
    pub fn active_sessions(&self, user_id: UserId) -> usize {
        let now = Utc::now().timestamp();
        self.refresh
            .iter()
            .filter(|entry| entry.user_id == user_id && !entry.is_expired(now))
            .count()
    }

    /// Deny an access token until it expires on its own
    pub fn revoke_access(&self, jti: &str, expires_at: i64) {
        self.purge_expired();
        self.revoked.insert(jti.to_string(), expires_at);
    }

    /// Check whether an access token was revoked
    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked.contains_key(jti)
    }

    /// Drop entries whose tokens would be rejected as expired anyway
    pub fn purge_expired(&self) {
        let now = Utc::now().timestamp();
        self.revoked.retain(|_, exp| *exp >= now);
        self.refresh.retain(|_, session| !session.is_expired(now));
    }
}
