//! Path parameter extractors
//!
//! Type-safe extraction of integer ids from path parameters.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use sala_core::{RoomId, UserId};
use serde::de::DeserializeOwned;

use crate::response::ApiError;

/// Path extractor whose rejection is rendered as an `ApiError`
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        Ok(ApiPath(inner))
    }
}

/// Path parameters with user_id
#[derive(Debug, serde::Deserialize)]
pub struct UserIdPath {
    pub user_id: String,
}

impl UserIdPath {
    pub fn user_id(&self) -> Result<UserId, ApiError> {
        UserId::parse(&self.user_id).map_err(|_| ApiError::invalid_path("Invalid user_id format"))
    }
}

/// Path parameters with room_id
#[derive(Debug, serde::Deserialize)]
pub struct RoomIdPath {
    pub room_id: String,
}

impl RoomIdPath {
    pub fn room_id(&self) -> Result<RoomId, ApiError> {
        RoomId::parse(&self.room_id).map_err(|_| ApiError::invalid_path("Invalid room_id format"))
    }
}

/// Path parameters with room_id and user_id
#[derive(Debug, serde::Deserialize)]
pub struct RoomMemberPath {
    pub room_id: String,
    pub user_id: String,
}

impl RoomMemberPath {
    pub fn room_id(&self) -> Result<RoomId, ApiError> {
        RoomId::parse(&self.room_id).map_err(|_| ApiError::invalid_path("Invalid room_id format"))
    }

    pub fn user_id(&self) -> Result<UserId, ApiError> {
        UserId::parse(&self.user_id).map_err(|_| ApiError::invalid_path("Invalid user_id format"))
    }
}
