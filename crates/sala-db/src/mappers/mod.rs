//! Entity to model mappers
//!
//! Conversions from database rows (models) to domain entities (sala-core).

mod member;
mod room;
mod user;

pub use member::parse_room_role;
pub use room::joined_room;
