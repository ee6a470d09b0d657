//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{Room, RoomMember, User};
use crate::error::DomainError;
use crate::value_objects::{RoomId, RoomRole, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    /// Find user by exact username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Check if a username is already taken
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    /// Active users whose username contains `query`, case-insensitively
    async fn search(&self, query: &str, limit: i64) -> RepoResult<Vec<User>>;

    /// Create a new user and return it with its assigned id
    async fn create(&self, username: &str, password_hash: &str) -> RepoResult<User>;

    /// Update profile fields (username)
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>>;

    /// Update password hash
    async fn update_password(&self, id: UserId, password_hash: &str) -> RepoResult<()>;
}

// ============================================================================
// Room Repository
// ============================================================================

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Find room by ID
    async fn find_by_id(&self, id: RoomId) -> RepoResult<Option<Room>>;

    /// List the rooms a user has joined together with the user's role in each
    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Vec<(Room, RoomRole)>>;

    /// List all public rooms
    async fn find_public(&self) -> RepoResult<Vec<Room>>;

    /// Create a room and make `creator` its admin in one transaction
    async fn create_with_admin(
        &self,
        name: &str,
        private: bool,
        creator: UserId,
    ) -> RepoResult<Room>;

    /// Update name and visibility
    async fn update(&self, room: &Room) -> RepoResult<()>;

    /// Delete a room and all of its memberships
    async fn delete(&self, id: RoomId) -> RepoResult<()>;

    /// Number of members in a room
    async fn member_count(&self, id: RoomId) -> RepoResult<i64>;
}

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find membership by room and user ID
    async fn find(&self, room_id: RoomId, user_id: UserId) -> RepoResult<Option<RoomMember>>;

    /// List members of a room, oldest membership first
    async fn find_by_room(&self, room_id: RoomId) -> RepoResult<Vec<RoomMember>>;

    /// Check if user is a member of room
    async fn is_member(&self, room_id: RoomId, user_id: UserId) -> RepoResult<bool>;

    /// Add member to room
    async fn create(&self, member: &RoomMember) -> RepoResult<()>;

    /// Change a member's role
    async fn set_role(&self, room_id: RoomId, user_id: UserId, role: RoomRole) -> RepoResult<()>;

    /// Remove member from room
    async fn delete(&self, room_id: RoomId, user_id: UserId) -> RepoResult<()>;

    /// Number of admins in a room
    async fn count_admins(&self, room_id: RoomId) -> RepoResult<i64>;
}
