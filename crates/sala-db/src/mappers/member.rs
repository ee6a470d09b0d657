//! Room membership entity <-> model mapper

use sala_core::entities::RoomMember;
use sala_core::error::DomainError;
use sala_core::value_objects::{RoomId, RoomRole, UserId};

use crate::models::RoomMemberModel;

/// Parse a stored role, treating unknown values as corrupt data
pub fn parse_room_role(raw: &str) -> Result<RoomRole, DomainError> {
    raw.parse().map_err(DomainError::DatabaseError)
}

impl TryFrom<RoomMemberModel> for RoomMember {
    type Error = DomainError;

    fn try_from(model: RoomMemberModel) -> Result<Self, Self::Error> {
        Ok(RoomMember {
            room_id: RoomId::new(model.room_id),
            user_id: UserId::new(model.user_id),
            role: parse_room_role(&model.role)?,
            joined_at: model.joined_at,
        })
    }
}
