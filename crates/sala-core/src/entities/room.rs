//! Room entity - a named chat room, public or private

use chrono::{DateTime, Utc};

use crate::value_objects::RoomId;

/// Maximum room name length in characters
pub const ROOM_NAME_MAX_LEN: usize = 100;

/// Chat room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    #[inline]
    pub fn is_public(&self) -> bool {
        !self.private
    }

    /// Rename the room
    pub fn rename(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    /// Change the room visibility
    pub fn set_private(&mut self, private: bool) {
        self.private = private;
        self.updated_at = Utc::now();
    }

    /// Trim a candidate room name, returning `None` if it is empty or too long
    pub fn normalize_name(name: &str) -> Option<String> {
        let trimmed = name.trim();
        let len = trimmed.chars().count();
        (1..=ROOM_NAME_MAX_LEN)
            .contains(&len)
            .then(|| trimmed.to_string())
    }
}
