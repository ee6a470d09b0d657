//! Room database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for rooms table
#[derive(Debug, Clone, FromRow)]
pub struct RoomModel {
    pub id: i64,
    pub name: String,
    pub private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Room joined with the role a given user holds in it
#[derive(Debug, Clone, FromRow)]
pub struct JoinedRoomModel {
    #[sqlx(flatten)]
    pub room: RoomModel,
    pub member_role: String,
}
