//! Repository implementations
//!
//! SQLite implementations of the repository traits defined in sala-core.
//! Each repository handles database operations for a specific domain entity.

mod error;
mod member;
mod room;
mod user;

pub use member::SqliteMemberRepository;
pub use room::SqliteRoomRepository;
pub use user::SqliteUserRepository;
