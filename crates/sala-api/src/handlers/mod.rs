//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod auth;
pub mod health;
pub mod rooms;
pub mod users;

use sala_common::AppError;

use crate::response::ApiError;

/// JSON 404 for unknown routes
pub async fn fallback() -> ApiError {
    ApiError::App(AppError::not_found("route"))
}
