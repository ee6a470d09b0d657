//! Room service
//!
//! Handles room creation, visibility, administration and membership.
//!
//! A private room is invisible to non-members: every lookup from outside
//! reports it as unknown. Every non-empty room keeps at least one admin.

use sala_core::entities::{Room, RoomMember, User};
use sala_core::{DomainError, RoomId, RoomRole, UserId};
use tracing::{info, instrument};

use crate::dto::{
    AddMemberRequest, CreateRoomRequest, JoinedRoomResponse, MemberResponse, MemberWithUser,
    RoomDetailResponse, RoomResponse, UpdateRoomRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Room service
pub struct RoomService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoomService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Rooms
    // ========================================================================

    /// Rooms the user has joined, with the user's role in each
    #[instrument(skip(self))]
    pub async fn list_joined(&self, user_id: UserId) -> ServiceResult<Vec<JoinedRoomResponse>> {
        let rooms = self.ctx.room_repo().find_by_user(user_id).await?;
        Ok(rooms.into_iter().map(JoinedRoomResponse::from).collect())
    }

    /// All public rooms
    #[instrument(skip(self))]
    pub async fn list_public(&self) -> ServiceResult<Vec<RoomResponse>> {
        let rooms = self.ctx.room_repo().find_public().await?;
        Ok(rooms.into_iter().map(RoomResponse::from).collect())
    }

    /// Create a room; the creator becomes its admin
    #[instrument(skip(self, request))]
    pub async fn create_room(
        &self,
        user_id: UserId,
        request: CreateRoomRequest,
    ) -> ServiceResult<RoomResponse> {
        let name = Room::normalize_name(&request.nombre)
            .ok_or(DomainError::InvalidRoomName(request.nombre))?;

        let room = self
            .ctx
            .room_repo()
            .create_with_admin(&name, request.privada, user_id)
            .await?;

        info!(room_id = %room.id, user_id = %user_id, private = room.private, "Room created");

        Ok(RoomResponse::from(room))
    }

    /// Get a room as seen by the user
    #[instrument(skip(self))]
    pub async fn get_room(
        &self,
        room_id: RoomId,
        user_id: UserId,
    ) -> ServiceResult<RoomDetailResponse> {
        let (room, membership) = self.visible_room(room_id, user_id).await?;
        let member_count = self.ctx.room_repo().member_count(room_id).await?;

        Ok(RoomDetailResponse::new(
            &room,
            member_count,
            membership.map(|m| m.role),
        ))
    }

    /// Rename a room or change its visibility (admin only)
    #[instrument(skip(self, request))]
    pub async fn update_room(
        &self,
        room_id: RoomId,
        user_id: UserId,
        request: UpdateRoomRequest,
    ) -> ServiceResult<RoomResponse> {
        let mut room = self.require_admin(room_id, user_id).await?;

        if let Some(nombre) = request.nombre {
            let name =
                Room::normalize_name(&nombre).ok_or(DomainError::InvalidRoomName(nombre))?;
            room.rename(name);
        }

        if let Some(private) = request.privada {
            room.set_private(private);
        }

        self.ctx.room_repo().update(&room).await?;

        info!(room_id = %room_id, user_id = %user_id, "Room updated");

        Ok(RoomResponse::from(room))
    }

    /// Delete a room and all its memberships (admin only)
    #[instrument(skip(self))]
    pub async fn delete_room(&self, room_id: RoomId, user_id: UserId) -> ServiceResult<()> {
        self.require_admin(room_id, user_id).await?;
        self.ctx.room_repo().delete(room_id).await?;

        info!(room_id = %room_id, user_id = %user_id, "Room deleted");

        Ok(())
    }

    // ========================================================================
    // Membership
    // ========================================================================

    /// Join a public room as a plain member
    #[instrument(skip(self))]
    pub async fn join_room(&self, room_id: RoomId, user_id: UserId) -> ServiceResult<MemberResponse> {
        let (room, membership) = self.visible_room(room_id, user_id).await?;
        if membership.is_some() {
            return Err(DomainError::AlreadyMember.into());
        }

        let user = self.active_user(user_id).await?;
        let member = RoomMember::new(room.id, user_id, RoomRole::Member);
        self.ctx.member_repo().create(&member).await?;

        info!(room_id = %room_id, user_id = %user_id, "User joined room");

        Ok(MemberResponse::from(MemberWithUser {
            member: &member,
            username: &user.username,
        }))
    }

    /// Leave a room
    #[instrument(skip(self))]
    pub async fn leave_room(&self, room_id: RoomId, user_id: UserId) -> ServiceResult<()> {
        self.ctx
            .room_repo()
            .find_by_id(room_id)
            .await?
            .ok_or(DomainError::RoomNotFound(room_id))?;

        self.remove_membership(room_id, user_id).await
    }

    /// Members of a visible room, longest-standing first
    #[instrument(skip(self))]
    pub async fn list_members(
        &self,
        room_id: RoomId,
        user_id: UserId,
    ) -> ServiceResult<Vec<MemberResponse>> {
        self.visible_room(room_id, user_id).await?;

        let members = self.ctx.member_repo().find_by_room(room_id).await?;
        let mut responses = Vec::with_capacity(members.len());
        for member in &members {
            if let Some(user) = self.ctx.user_repo().find_by_id(member.user_id).await? {
                responses.push(MemberResponse::from(MemberWithUser {
                    member,
                    username: &user.username,
                }));
            }
        }

        Ok(responses)
    }

    /// Add a user to a room (admin only)
    #[instrument(skip(self, request))]
    pub async fn add_member(
        &self,
        room_id: RoomId,
        actor_id: UserId,
        request: AddMemberRequest,
    ) -> ServiceResult<MemberResponse> {
        self.require_admin(room_id, actor_id).await?;

        let user = self.active_user(request.user_id).await?;
        if self.ctx.member_repo().is_member(room_id, user.id).await? {
            return Err(DomainError::AlreadyMember.into());
        }

        let member = RoomMember::new(room_id, user.id, RoomRole::Member);
        self.ctx.member_repo().create(&member).await?;

        info!(room_id = %room_id, actor_id = %actor_id, user_id = %user.id, "Member added");

        Ok(MemberResponse::from(MemberWithUser {
            member: &member,
            username: &user.username,
        }))
    }

    /// Remove a user from a room (admin only, or the user themselves)
    #[instrument(skip(self))]
    pub async fn remove_member(
        &self,
        room_id: RoomId,
        actor_id: UserId,
        target_id: UserId,
    ) -> ServiceResult<()> {
        if actor_id == target_id {
            return self.leave_room(room_id, actor_id).await;
        }

        self.require_admin(room_id, actor_id).await?;
        self.remove_membership(room_id, target_id).await?;

        info!(room_id = %room_id, actor_id = %actor_id, user_id = %target_id, "Member removed");

        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Load a room the user may see, with the user's membership if any
    async fn visible_room(
        &self,
        room_id: RoomId,
        user_id: UserId,
    ) -> ServiceResult<(Room, Option<RoomMember>)> {
        let room = self
            .ctx
            .room_repo()
            .find_by_id(room_id)
            .await?
            .ok_or(DomainError::RoomNotFound(room_id))?;

        let membership = self.ctx.member_repo().find(room_id, user_id).await?;

        if room.private && membership.is_none() {
            return Err(DomainError::RoomNotFound(room_id).into());
        }

        Ok((room, membership))
    }

    async fn require_admin(&self, room_id: RoomId, user_id: UserId) -> ServiceResult<Room> {
        let (room, membership) = self.visible_room(room_id, user_id).await?;

        match membership {
            Some(member) if member.role.is_admin() => Ok(room),
            _ => Err(DomainError::NotRoomAdmin.into()),
        }
    }

    async fn active_user(&self, user_id: UserId) -> ServiceResult<User> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .filter(User::is_active)
            .ok_or(DomainError::UserNotFound(user_id))?;
        Ok(user)
    }

    /// Drop a membership, keeping an admin in the room or deleting it once empty
    async fn remove_membership(&self, room_id: RoomId, user_id: UserId) -> ServiceResult<()> {
        let membership = self
            .ctx
            .member_repo()
            .find(room_id, user_id)
            .await?
            .ok_or(DomainError::MemberNotFound)?;

        self.ctx.member_repo().delete(room_id, user_id).await?;
        info!(room_id = %room_id, user_id = %user_id, "User left room");

        let remaining = self.ctx.member_repo().find_by_room(room_id).await?;
        let Some(oldest) = remaining.first() else {
            self.ctx.room_repo().delete(room_id).await?;
            info!(room_id = %room_id, "Empty room deleted");
            return Ok(());
        };

        if membership.role.is_admin() && self.ctx.member_repo().count_admins(room_id).await? == 0 {
            self.ctx
                .member_repo()
                .set_role(room_id, oldest.user_id, RoomRole::Admin)
                .await?;
            info!(room_id = %room_id, user_id = %oldest.user_id, "Member promoted to admin");
        }

        Ok(())
    }
}
