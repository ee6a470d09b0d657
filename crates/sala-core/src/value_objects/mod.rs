//! Value objects - immutable types that represent domain concepts

mod ids;
mod room_role;

pub use ids::{IdParseError, RoomId, UserId};
pub use room_role::RoomRole;
