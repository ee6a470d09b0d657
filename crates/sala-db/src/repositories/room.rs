//! SQLite implementation of RoomRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use sala_core::entities::Room;
use sala_core::traits::{RepoResult, RoomRepository};
use sala_core::value_objects::{RoomId, RoomRole, UserId};

use crate::mappers::joined_room;
use crate::models::{JoinedRoomModel, RoomModel};

use super::error::{map_db_error, room_not_found};

/// SQLite implementation of RoomRepository
#[derive(Clone)]
pub struct SqliteRoomRepository {
    pool: SqlitePool,
}

impl SqliteRoomRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for SqliteRoomRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: RoomId) -> RepoResult<Option<Room>> {
        let result = sqlx::query_as::<_, RoomModel>(
            r"
            SELECT id, name, private, created_at, updated_at
            FROM rooms
            WHERE id = ?
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Room::from))
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Vec<(Room, RoomRole)>> {
        let rows = sqlx::query_as::<_, JoinedRoomModel>(
            r"
            SELECT r.id, r.name, r.private, r.created_at, r.updated_at,
                   m.role AS member_role
            FROM rooms r
            INNER JOIN room_members m ON m.room_id = r.id
            WHERE m.user_id = ?
            ORDER BY r.id
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(joined_room).collect()
    }

    #[instrument(skip(self))]
    async fn find_public(&self) -> RepoResult<Vec<Room>> {
        let rows = sqlx::query_as::<_, RoomModel>(
            r"
            SELECT id, name, private, created_at, updated_at
            FROM rooms
            WHERE private = 0
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Room::from).collect())
    }

    #[instrument(skip(self))]
    async fn create_with_admin(
        &self,
        name: &str,
        private: bool,
        creator: UserId,
    ) -> RepoResult<Room> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let room = sqlx::query_as::<_, RoomModel>(
            r"
            INSERT INTO rooms (name, private, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, private, created_at, updated_at
            ",
        )
        .bind(name)
        .bind(private)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO room_members (room_id, user_id, role, joined_at)
            VALUES (?, ?, ?, ?)
            ",
        )
        .bind(room.id)
        .bind(creator.into_inner())
        .bind(RoomRole::Admin.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(Room::from(room))
    }

    #[instrument(skip(self))]
    async fn update(&self, room: &Room) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE rooms
            SET name = ?, private = ?, updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(&room.name)
        .bind(room.private)
        .bind(room.updated_at)
        .bind(room.id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(room_not_found(room.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: RoomId) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("DELETE FROM room_members WHERE room_id = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let result = sqlx::query("DELETE FROM rooms WHERE id = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(room_not_found(id));
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn member_count(&self, id: RoomId) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM room_members WHERE room_id = ?
            ",
        )
        .bind(id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }
}
