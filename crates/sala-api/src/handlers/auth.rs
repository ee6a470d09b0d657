//! Authentication handlers
//!
//! Endpoints for registration, login, token refresh, logout and token checks.

use axum::{extract::State, Json};
use sala_service::dto::{
    AuthResponse, LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest,
    VerifyResponse,
};
use sala_service::AuthService;

use crate::extractors::{AuthUser, OptionalJson, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Register a new user
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<AuthResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Created(Json(response)))
}

/// Login with username and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// Refresh access token
///
/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.refresh_tokens(request).await?;
    Ok(Json(response))
}

/// Logout user
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    OptionalJson(request): OptionalJson<LogoutRequest>,
) -> ApiResult<NoContent> {
    let service = AuthService::new(state.service_context());
    service.logout(&auth.claims, request).await?;
    Ok(NoContent)
}

/// Describe the presented access token
///
/// GET|POST /auth/verify
pub async fn verify(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<VerifyResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.verify(&auth.claims)?;
    Ok(Json(response))
}
