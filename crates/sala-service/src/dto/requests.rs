//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use sala_core::{User, UserId};
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Username character and length rules shared by registration and profile updates
fn validate_username(username: &str) -> Result<(), ValidationError> {
    if User::is_valid_username(username) {
        Ok(())
    } else {
        let mut err = ValidationError::new("username");
        err.message = Some(
            "Username must be 3-32 characters of letters, digits, '_', '-' or '.'".into(),
        );
        Err(err)
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

fn default_private() -> bool {
    true
}

// ============================================================================
// Auth Requests
// ============================================================================

/// User registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Logout request (optional refresh token to revoke)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

// ============================================================================
// User Requests
// ============================================================================

/// Update current user request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: Option<String>,

    #[validate(custom(function = "validate_username"))]
    pub username: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.password.is_none() && self.username.is_none()
    }
}

/// User search query string (`?query=&limit=`)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchUsersQuery {
    #[validate(custom(function = "validate_not_blank"))]
    pub query: String,

    pub limit: Option<i64>,
}

// ============================================================================
// Room Requests
// ============================================================================

/// Create room request
///
/// `nombre` is trimmed and length-checked by the room service.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoomRequest {
    pub nombre: String,

    /// Rooms are private unless stated otherwise
    #[serde(default = "default_private")]
    pub privada: bool,
}

/// Update room request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRoomRequest {
    pub nombre: Option<String>,

    pub privada: Option<bool>,
}

/// Add a user to a room (admin only)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddMemberRequest {
    pub user_id: UserId,
}
