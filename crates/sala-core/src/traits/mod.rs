//! Repository traits (ports)

mod repositories;

pub use repositories::{MemberRepository, RepoResult, RoomRepository, UserRepository};
