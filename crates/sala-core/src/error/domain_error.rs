//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{RoomId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    #[error("Member not found in room")]
    MemberNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid room name: {0}")]
    InvalidRoomName(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Only room admins can do this")]
    NotRoomAdmin,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username already taken")]
    UsernameTaken,

    #[error("Already a member of this room")]
    AlreadyMember,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::RoomNotFound(_) => "UNKNOWN_ROOM",
            Self::MemberNotFound => "UNKNOWN_MEMBER",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::InvalidRoomName(_) => "INVALID_ROOM_NAME",
            Self::WeakPassword(_) => "WEAK_PASSWORD",

            // Authorization
            Self::NotRoomAdmin => "NOT_ROOM_ADMIN",

            // Conflict
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::AlreadyMember => "ALREADY_MEMBER",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::RoomNotFound(_) | Self::MemberNotFound
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidUsername(_)
                | Self::InvalidRoomName(_)
                | Self::WeakPassword(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotRoomAdmin)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::UsernameTaken | Self::AlreadyMember)
    }
}
