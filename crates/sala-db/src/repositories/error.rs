//! Error handling utilities for repositories

use sala_core::error::DomainError;
use sala_core::value_objects::{RoomId, UserId};
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

pub fn user_not_found(id: UserId) -> DomainError {
    DomainError::UserNotFound(id)
}

pub fn room_not_found(id: RoomId) -> DomainError {
    DomainError::RoomNotFound(id)
}

pub fn member_not_found() -> DomainError {
    DomainError::MemberNotFound
}

/// Escape `LIKE` wildcards so the query is matched literally (`ESCAPE '\'`)
pub fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
