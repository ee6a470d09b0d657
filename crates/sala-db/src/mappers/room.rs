//! Room entity <-> model mapper

use sala_core::entities::Room;
use sala_core::error::DomainError;
use sala_core::value_objects::{RoomId, RoomRole};

use crate::models::{JoinedRoomModel, RoomModel};

use super::parse_room_role;

/// Convert RoomModel to Room entity
impl From<RoomModel> for Room {
    fn from(model: RoomModel) -> Self {
        Room {
            id: RoomId::new(model.id),
            name: model.name,
            private: model.private,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Split a joined row into the room and the member's role
pub fn joined_room(model: JoinedRoomModel) -> Result<(Room, RoomRole), DomainError> {
    let role = parse_room_role(&model.member_role)?;
    Ok((Room::from(model.room), role))
}
