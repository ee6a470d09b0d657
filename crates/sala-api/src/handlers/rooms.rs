//! Room handlers
//!
//! Endpoints for rooms and room membership.

use axum::{extract::State, Json};
use sala_service::dto::{
    AddMemberRequest, CreateRoomRequest, JoinedRoomResponse, MemberResponse, RoomDetailResponse,
    RoomResponse, UpdateRoomRequest,
};
use sala_service::RoomService;

use crate::extractors::{ApiPath, AuthUser, RoomIdPath, RoomMemberPath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// List the caller's rooms
///
/// GET /rooms
pub async fn list_rooms(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<JoinedRoomResponse>>> {
    let service = RoomService::new(state.service_context());
    let rooms = service.list_joined(auth.user_id).await?;
    Ok(Json(rooms))
}

/// List public rooms
///
/// GET /rooms/public
pub async fn list_public_rooms(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<RoomResponse>>> {
    let service = RoomService::new(state.service_context());
    let rooms = service.list_public().await?;
    Ok(Json(rooms))
}

/// Create a room
///
/// POST /rooms
pub async fn create_room(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateRoomRequest>,
) -> ApiResult<Created<Json<RoomResponse>>> {
    let service = RoomService::new(state.service_context());
    let room = service.create_room(auth.user_id, request).await?;
    Ok(Created(Json(room)))
}

/// Get a room
///
/// GET /rooms/{room_id}
pub async fn get_room(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<RoomIdPath>,
) -> ApiResult<Json<RoomDetailResponse>> {
    let room_id = path.room_id()?;

    let service = RoomService::new(state.service_context());
    let room = service.get_room(room_id, auth.user_id).await?;
    Ok(Json(room))
}

/// Update a room
///
/// PUT|PATCH /rooms/{room_id}
pub async fn update_room(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<RoomIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateRoomRequest>,
) -> ApiResult<Json<RoomResponse>> {
    let room_id = path.room_id()?;

    let service = RoomService::new(state.service_context());
    let room = service.update_room(room_id, auth.user_id, request).await?;
    Ok(Json(room))
}

/// Delete a room
///
/// DELETE /rooms/{room_id}
pub async fn delete_room(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<RoomIdPath>,
) -> ApiResult<NoContent> {
    let room_id = path.room_id()?;

    let service = RoomService::new(state.service_context());
    service.delete_room(room_id, auth.user_id).await?;
    Ok(NoContent)
}

/// Join a public room
///
/// POST /rooms/{room_id}/join
pub async fn join_room(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<RoomIdPath>,
) -> ApiResult<Json<MemberResponse>> {
    let room_id = path.room_id()?;

    let service = RoomService::new(state.service_context());
    let member = service.join_room(room_id, auth.user_id).await?;
    Ok(Json(member))
}

/// Leave a room
///
/// POST /rooms/{room_id}/leave
pub async fn leave_room(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<RoomIdPath>,
) -> ApiResult<NoContent> {
    let room_id = path.room_id()?;

    let service = RoomService::new(state.service_context());
    service.leave_room(room_id, auth.user_id).await?;
    Ok(NoContent)
}

/// List room members
///
/// GET /rooms/{room_id}/members
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<RoomIdPath>,
) -> ApiResult<Json<Vec<MemberResponse>>> {
    let room_id = path.room_id()?;

    let service = RoomService::new(state.service_context());
    let members = service.list_members(room_id, auth.user_id).await?;
    Ok(Json(members))
}

/// Add a member to a room
///
/// POST /rooms/{room_id}/members
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<RoomIdPath>,
    ValidatedJson(request): ValidatedJson<AddMemberRequest>,
) -> ApiResult<Created<Json<MemberResponse>>> {
    let room_id = path.room_id()?;

    let service = RoomService::new(state.service_context());
    let member = service.add_member(room_id, auth.user_id, request).await?;
    Ok(Created(Json(member)))
}

/// Remove a member from a room
///
/// DELETE /rooms/{room_id}/members/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<RoomMemberPath>,
) -> ApiResult<NoContent> {
    let room_id = path.room_id()?;
    let user_id = path.user_id()?;

    let service = RoomService::new(state.service_context());
    service.remove_member(room_id, auth.user_id, user_id).await?;
    Ok(NoContent)
}
