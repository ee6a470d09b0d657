//! Integer identifiers for users and rooms
//!
//! Both ids are backed by SQLite `INTEGER PRIMARY KEY AUTOINCREMENT` columns,
//! so they are always positive once persisted. They serialize as JSON numbers
//! and accept either a number or a decimal string when deserializing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Error when parsing an id from a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("invalid id format")]
    InvalidFormat,

    #[error("id must be positive")]
    NotPositive,
}

fn parse_positive(s: &str) -> Result<i64, IdParseError> {
    let value = s
        .trim()
        .parse::<i64>()
        .map_err(|_| IdParseError::InvalidFormat)?;
    if value <= 0 {
        return Err(IdParseError::NotPositive);
    }
    Ok(value)
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $expecting:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw database id
            #[inline]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the inner i64 value
            #[inline]
            pub const fn into_inner(self) -> i64 {
                self.0
            }

            /// Parse from string representation
            pub fn parse(s: &str) -> Result<Self, IdParseError> {
                parse_positive(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_i64(self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                use serde::de::{self, Visitor};

                struct IdVisitor;

                impl<'de> Visitor<'de> for IdVisitor {
                    type Value = $name;

                    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                        formatter.write_str($expecting)
                    }

                    fn visit_i64<E>(self, value: i64) -> Result<$name, E>
                    where
                        E: de::Error,
                    {
                        if value <= 0 {
                            return Err(de::Error::custom(IdParseError::NotPositive));
                        }
                        Ok($name(value))
                    }

                    fn visit_u64<E>(self, value: u64) -> Result<$name, E>
                    where
                        E: de::Error,
                    {
                        i64::try_from(value)
                            .map_err(|_| de::Error::custom(IdParseError::InvalidFormat))
                            .and_then(|v| self.visit_i64(v))
                    }

                    fn visit_str<E>(self, value: &str) -> Result<$name, E>
                    where
                        E: de::Error,
                    {
                        $name::parse(value).map_err(de::Error::custom)
                    }
                }

                deserializer.deserialize_any(IdVisitor)
            }
        }
    };
}

entity_id!(
    /// Identifier of a user account
    UserId,
    "a positive integer or numeric string user id"
);

entity_id!(
    /// Identifier of a chat room
    RoomId,
    "a positive integer or numeric string room id"
);
