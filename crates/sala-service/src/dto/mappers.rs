//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use sala_core::entities::{Room, RoomMember, User};
use sala_core::RoomRole;

use super::responses::{
    CurrentUserResponse, JoinedRoomResponse, MemberResponse, PublicUserResponse,
    RoomDetailResponse, RoomResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for CurrentUserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl From<&User> for PublicUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
        }
    }
}

impl From<User> for PublicUserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

// ============================================================================
// Room Mappers
// ============================================================================

impl From<&Room> for RoomResponse {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id,
            nombre: room.name.clone(),
            privada: room.private,
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self::from(&room)
    }
}

impl From<(Room, RoomRole)> for JoinedRoomResponse {
    fn from((room, role): (Room, RoomRole)) -> Self {
        Self {
            id: room.id,
            nombre: room.name,
            privada: room.private,
            created_at: room.created_at,
            role,
        }
    }
}

impl RoomDetailResponse {
    pub fn new(room: &Room, member_count: i64, role: Option<RoomRole>) -> Self {
        Self {
            room: RoomResponse::from(room),
            member_count,
            role,
        }
    }
}

// ============================================================================
// Member Mappers
// ============================================================================

/// Membership together with the member's username
pub struct MemberWithUser<'a> {
    pub member: &'a RoomMember,
    pub username: &'a str,
}

impl From<MemberWithUser<'_>> for MemberResponse {
    fn from(data: MemberWithUser<'_>) -> Self {
        Self {
            room_id: data.member.room_id,
            user_id: data.member.user_id,
            username: data.username.to_string(),
            role: data.member.role,
            joined_at: data.member.joined_at,
        }
    }
}
