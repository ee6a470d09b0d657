//! SQLite implementation of UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use sala_core::entities::{User, DEFAULT_USER_ROLE};
use sala_core::error::DomainError;
use sala_core::traits::{RepoResult, UserRepository};
use sala_core::value_objects::UserId;

use crate::models::UserModel;

use super::error::{escape_like, map_db_error, map_unique_violation, user_not_found};

/// SQLite implementation of UserRepository
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, role, active, created_at, updated_at
            FROM users
            WHERE id = ?
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, role, active, created_at, updated_at
            FROM users
            WHERE username = ?
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)
            ",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: i64) -> RepoResult<Vec<User>> {
        // SQLite LIKE is case-insensitive for ASCII
        let pattern = format!("%{}%", escape_like(query));

        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, role, active, created_at, updated_at
            FROM users
            WHERE active = 1 AND username LIKE ? ESCAPE '\'
            ORDER BY username
            LIMIT ?
            ",
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self, password_hash))]
    async fn create(&self, username: &str, password_hash: &str) -> RepoResult<User> {
        let now = Utc::now();

        let result = sqlx::query_as::<_, UserModel>(
            r"
            INSERT INTO users (username, password_hash, role, active, created_at, updated_at)
            VALUES (?, ?, ?, 1, ?, ?)
            RETURNING id, username, role, active, created_at, updated_at
            ",
        )
        .bind(username)
        .bind(password_hash)
        .bind(DEFAULT_USER_ROLE)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::UsernameTaken))?;

        Ok(User::from(result))
    }

    #[instrument(skip(self))]
    async fn update(&self, user: &User) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET username = ?, updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(&user.username)
        .bind(Utc::now())
        .bind(user.id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::UsernameTaken))?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(user.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>> {
        let result = sqlx::query_scalar::<_, String>(
            r"
            SELECT password_hash FROM users WHERE id = ?
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: UserId, password_hash: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET password_hash = ?, updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(password_hash)
        .bind(Utc::now())
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        Ok(())
    }
}
