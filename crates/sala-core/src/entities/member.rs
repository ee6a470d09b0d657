//! Member entity - represents a user's membership in a room

use chrono::{DateTime, Utc};

use crate::value_objects::{RoomId, RoomRole, UserId};

/// Room membership (junction between User and Room)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMember {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub role: RoomRole,
    pub joined_at: DateTime<Utc>,
}

impl RoomMember {
    /// Create a new membership joined now
    pub fn new(room_id: RoomId, user_id: UserId, role: RoomRole) -> Self {
        Self {
            room_id,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
