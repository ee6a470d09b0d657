//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for users table (without the password hash)
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
