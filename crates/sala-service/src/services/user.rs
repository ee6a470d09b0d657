//! User service
//!
//! Handles profile reads, profile updates and user search.

use sala_common::auth::{hash_password, validate_password_strength};
use sala_common::AppError;
use sala_core::entities::User;
use sala_core::{DomainError, UserId};
use tracing::{info, instrument};

use crate::dto::{CurrentUserResponse, PublicUserResponse, UpdateUserRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Number of search results returned when no limit is given
pub const SEARCH_DEFAULT_LIMIT: i64 = 10;
/// Upper bound for the search `limit` parameter
pub const SEARCH_MAX_LIMIT: i64 = 50;

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get the authenticated user's own profile
    #[instrument(skip(self))]
    pub async fn get_current_user(&self, user_id: UserId) -> ServiceResult<CurrentUserResponse> {
        let user = self.find_user(user_id).await?;
        Ok(CurrentUserResponse::from(user))
    }

    /// Get another user's public profile
    ///
    /// Inactive accounts are reported as unknown.
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: UserId) -> ServiceResult<PublicUserResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .filter(User::is_active)
            .ok_or(DomainError::UserNotFound(user_id))?;

        Ok(PublicUserResponse::from(user))
    }

    /// Case-insensitive substring search over active usernames
    #[instrument(skip(self))]
    pub async fn search_users(
        &self,
        query: &str,
        limit: Option<i64>,
    ) -> ServiceResult<Vec<PublicUserResponse>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ServiceError::validation("Search query must not be empty"));
        }

        let limit = clamp_search_limit(limit);
        let users = self.ctx.user_repo().search(query, limit).await?;

        Ok(users.into_iter().map(PublicUserResponse::from).collect())
    }

    /// Update the authenticated user's profile
    ///
    /// Changing the password requires a fresh access token (one issued by
    /// login or registration, not by refresh). All fields are validated
    /// before anything is written.
    #[instrument(skip(self, request))]
    pub async fn update_current_user(
        &self,
        user_id: UserId,
        fresh: bool,
        request: UpdateUserRequest,
    ) -> ServiceResult<CurrentUserResponse> {
        let mut user = self.find_user(user_id).await?;
        if request.is_empty() {
            return Ok(CurrentUserResponse::from(user));
        }

        if let Some(password) = request.password.as_deref() {
            if !fresh {
                return Err(AppError::FreshTokenRequired.into());
            }
            validate_password_strength(password)?;
        }

        let new_username = request
            .username
            .filter(|username| *username != user.username);
        if let Some(username) = new_username.as_deref() {
            if !User::is_valid_username(username) {
                return Err(DomainError::InvalidUsername(username.to_string()).into());
            }
        }

        if let Some(username) = new_username {
            user.set_username(username);
            self.ctx.user_repo().update(&user).await?;
            info!(user_id = %user_id, username = %user.username, "Username changed");
        }

        if let Some(password) = request.password.as_deref() {
            let password_hash = hash_password(password)?;
            self.ctx
                .user_repo()
                .update_password(user_id, &password_hash)
                .await?;
            info!(user_id = %user_id, "Password changed");
        }

        let user = self.find_user(user_id).await?;
        Ok(CurrentUserResponse::from(user))
    }

    async fn find_user(&self, user_id: UserId) -> ServiceResult<User> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;
        Ok(user)
    }
}

/// Apply the default and clamp to `1..=SEARCH_MAX_LIMIT`
pub fn clamp_search_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(SEARCH_DEFAULT_LIMIT)
        .clamp(1, SEARCH_MAX_LIMIT)
}
