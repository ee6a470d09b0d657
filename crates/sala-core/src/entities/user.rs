//! User entity - represents an account that can log in and join rooms

use chrono::{DateTime, Utc};

use crate::value_objects::UserId;

/// Global role assigned to every account created through the API
pub const DEFAULT_USER_ROLE: &str = "user";

/// Minimum username length
pub const USERNAME_MIN_LEN: usize = 3;
/// Maximum username length
pub const USERNAME_MAX_LEN: usize = 32;

/// User account
///
/// The password hash is not part of the entity; repositories expose it
/// through dedicated methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check whether the account may authenticate
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Update the username
    pub fn set_username(&mut self, username: String) {
        self.username = username;
        self.updated_at = Utc::now();
    }

    /// Check a candidate username against the account naming rules
    ///
    /// Usernames are 3-32 characters of ASCII letters, digits, `_`, `-` or `.`.
    pub fn is_valid_username(username: &str) -> bool {
        (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username.len())
            && username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    }
}
