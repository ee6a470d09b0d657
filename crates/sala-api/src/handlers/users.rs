//! User handlers
//!
//! Endpoints for the caller's profile, public profiles and user search.

use axum::{extract::State, Json};
use sala_service::dto::{
    CurrentUserResponse, PublicUserResponse, SearchUsersQuery, UpdateUserRequest,
};
use sala_service::UserService;

use crate::extractors::{ApiPath, AuthUser, UserIdPath, ValidatedJson, ValidatedQuery};
use crate::response::ApiResult;
use crate::state::AppState;

/// Get current user
///
/// GET /user/me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.get_current_user(auth.user_id).await?;
    Ok(Json(response))
}

/// Update current user
///
/// PATCH /user/me
pub async fn update_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service
        .update_current_user(auth.user_id, auth.is_fresh(), request)
        .await?;
    Ok(Json(response))
}

/// Get user by ID (public profile)
///
/// GET /user/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(path): ApiPath<UserIdPath>,
) -> ApiResult<Json<PublicUserResponse>> {
    let user_id = path.user_id()?;

    let service = UserService::new(state.service_context());
    let response = service.get_user(user_id).await?;
    Ok(Json(response))
}

/// Search users by username substring
///
/// GET /users/search?query=&limit=
pub async fn search_users(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedQuery(params): ValidatedQuery<SearchUsersQuery>,
) -> ApiResult<Json<Vec<PublicUserResponse>>> {
    let service = UserService::new(state.service_context());
    let users = service.search_users(&params.query, params.limit).await?;
    Ok(Json(users))
}
