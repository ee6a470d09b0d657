//! Role a user holds inside a room

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Membership role within a single room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomRole {
    /// Can rename, change privacy, delete the room and manage members
    Admin,
    #[default]
    Member,
}

impl RoomRole {
    /// Storage and wire representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    #[inline]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for RoomRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            // "miembro" is the legacy spelling used by older databases
            "member" | "miembro" => Ok(Self::Member),
            other => Err(format!("unknown room role: {other}")),
        }
    }
}
