//! Domain entities - core business objects

mod member;
mod room;
mod user;

pub use member::RoomMember;
pub use room::Room;
pub use user::{User, DEFAULT_USER_ROLE};
