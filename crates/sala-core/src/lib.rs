//! # sala-core
//!
//! Domain layer containing entities, value objects and repository traits for
//! users, rooms and room memberships.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Room, RoomMember, User, DEFAULT_USER_ROLE};
pub use error::DomainError;
pub use traits::{MemberRepository, RepoResult, RoomRepository, UserRepository};
pub use value_objects::{IdParseError, RoomId, RoomRole, UserId};
