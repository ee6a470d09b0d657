//! Authentication extractor
//!
//! Extracts and validates bearer tokens from the Authorization header.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use sala_common::{AppError, Claims};
use sala_core::UserId;
use sala_service::AuthService;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated user extracted from a valid, unrevoked access token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    pub claims: Claims,
}

impl AuthUser {
    /// Whether the token came straight from a password login
    pub fn is_fresh(&self) -> bool {
        self.claims.fresh
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|e| {
                    if e.is_missing() {
                        ApiError::MissingAuth
                    } else {
                        tracing::warn!(error = %e, "Malformed Authorization header");
                        ApiError::App(AppError::InvalidToken)
                    }
                })?;

        let app_state = AppState::from_ref(state);

        let claims = AuthService::new(app_state.service_context())
            .authenticate(bearer.token())
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Rejected access token");
                e
            })?;

        let user_id = claims.user_id()?;

        Ok(AuthUser { user_id, claims })
    }
}
