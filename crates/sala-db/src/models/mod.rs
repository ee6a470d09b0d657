//! Database models - SQLx-compatible structs for SQLite tables

mod member;
mod room;
mod user;

pub use member::RoomMemberModel;
pub use room::{JoinedRoomModel, RoomModel};
pub use user::UserModel;
