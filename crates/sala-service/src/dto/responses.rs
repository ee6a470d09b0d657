//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Ids are serialized as JSON numbers; room fields keep the `nombre`/`privada` wire names.

use chrono::{DateTime, Utc};
use sala_core::{RoomId, RoomRole, UserId};
use serde::Serialize;

// ============================================================================
// Auth Responses
// ============================================================================

/// Authentication response with tokens
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user_id: UserId,
    pub username: String,
    pub role: String,
}

/// Result of inspecting the presented access token
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user_id: UserId,
    pub username: String,
    pub role: String,
    pub fresh: bool,
    /// Unix timestamp
    pub expires_at: i64,
}

// ============================================================================
// User Responses
// ============================================================================

/// Public user response (limited fields)
#[derive(Debug, Clone, Serialize)]
pub struct PublicUserResponse {
    pub id: UserId,
    pub username: String,
    pub role: String,
}

/// Current authenticated user response
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub id: UserId,
    pub username: String,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Room Responses
// ============================================================================

/// Room without caller-specific data
#[derive(Debug, Clone, Serialize)]
pub struct RoomResponse {
    pub id: RoomId,
    pub nombre: String,
    pub privada: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Entry of the caller's room list
#[derive(Debug, Clone, Serialize)]
pub struct JoinedRoomResponse {
    pub id: RoomId,
    pub nombre: String,
    pub privada: bool,
    pub created_at: DateTime<Utc>,
    pub role: RoomRole,
}

/// Single room as seen by the caller
#[derive(Debug, Clone, Serialize)]
pub struct RoomDetailResponse {
    #[serde(flatten)]
    pub room: RoomResponse,
    pub member_count: i64,
    /// Caller's role, `null` when not a member
    pub role: Option<RoomRole>,
}

/// Room membership
#[derive(Debug, Clone, Serialize)]
pub struct MemberResponse {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub username: String,
    pub role: RoomRole,
    pub joined_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
