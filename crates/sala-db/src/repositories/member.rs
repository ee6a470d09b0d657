//! SQLite implementation of MemberRepository

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::instrument;

use sala_core::entities::RoomMember;
use sala_core::error::DomainError;
use sala_core::traits::{MemberRepository, RepoResult};
use sala_core::value_objects::{RoomId, RoomRole, UserId};

use crate::models::RoomMemberModel;

use super::error::{map_db_error, map_unique_violation, member_not_found};

/// SQLite implementation of MemberRepository
#[derive(Clone)]
pub struct SqliteMemberRepository {
    pool: SqlitePool,
}

impl SqliteMemberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    #[instrument(skip(self))]
    async fn find(&self, room_id: RoomId, user_id: UserId) -> RepoResult<Option<RoomMember>> {
        let result = sqlx::query_as::<_, RoomMemberModel>(
            r"
            SELECT room_id, user_id, role, joined_at
            FROM room_members
            WHERE room_id = ? AND user_id = ?
            ",
        )
        .bind(room_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(RoomMember::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_room(&self, room_id: RoomId) -> RepoResult<Vec<RoomMember>> {
        // rowid breaks ties between members that joined in the same instant
        let rows = sqlx::query_as::<_, RoomMemberModel>(
            r"
            SELECT room_id, user_id, role, joined_at
            FROM room_members
            WHERE room_id = ?
            ORDER BY joined_at, rowid
            ",
        )
        .bind(room_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(RoomMember::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn is_member(&self, room_id: RoomId, user_id: UserId) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM room_members WHERE room_id = ? AND user_id = ?)
            ",
        )
        .bind(room_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn create(&self, member: &RoomMember) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO room_members (room_id, user_id, role, joined_at)
            VALUES (?, ?, ?, ?)
            ",
        )
        .bind(member.room_id.into_inner())
        .bind(member.user_id.into_inner())
        .bind(member.role.as_str())
        .bind(member.joined_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyMember))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_role(&self, room_id: RoomId, user_id: UserId, role: RoomRole) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE room_members
            SET role = ?
            WHERE room_id = ? AND user_id = ?
            ",
        )
        .bind(role.as_str())
        .bind(room_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(member_not_found());
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, room_id: RoomId, user_id: UserId) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM room_members WHERE room_id = ? AND user_id = ?
            ",
        )
        .bind(room_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(member_not_found());
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_admins(&self, room_id: RoomId) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM room_members WHERE room_id = ? AND role = 'admin'
            ",
        )
        .bind(room_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }
}
