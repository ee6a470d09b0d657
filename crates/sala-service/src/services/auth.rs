//! Authentication service
//!
//! Handles user registration, login, token refresh, logout and access token checks.

use sala_common::auth::{hash_password, validate_password_strength, verify_password};
use sala_common::{AppError, Claims, TokenSubject};
use sala_core::entities::User;
use sala_core::DomainError;
use tracing::{info, instrument, warn};

use crate::dto::{AuthResponse, LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest, VerifyResponse};
use crate::session::RefreshSession;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user and log them in
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        if !User::is_valid_username(&request.username) {
            return Err(DomainError::InvalidUsername(request.username).into());
        }

        validate_password_strength(&request.password)?;

        if self.ctx.user_repo().username_exists(&request.username).await? {
            return Err(DomainError::UsernameTaken.into());
        }

        let password_hash = hash_password(&request.password)?;

        // The unique index still guards against a concurrent registration
        let user = self
            .ctx
            .user_repo()
            .create(&request.username, &password_hash)
            .await?;

        info!(user_id = %user.id, "User registered successfully");

        self.issue_tokens(&user, true)
    }

    /// Login with username and password
    ///
    /// Unknown users, inactive users and wrong passwords all produce the same
    /// `INVALID_CREDENTIALS` error.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: user not found");
                AppError::InvalidCredentials
            })?;

        if !user.is_active() {
            warn!(user_id = %user.id, "Login failed: account inactive");
            return Err(AppError::InvalidCredentials.into());
        }

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Login failed: no password hash");
                AppError::InvalidCredentials
            })?;

        if !verify_password(&request.password, &password_hash)? {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(AppError::InvalidCredentials.into());
        }

        info!(user_id = %user.id, "User logged in successfully");

        self.issue_tokens(&user, true)
    }

    /// Exchange a refresh token for a new token pair
    ///
    /// The presented refresh token is consumed; the new access token is not fresh.
    #[instrument(skip(self, request))]
    pub async fn refresh_tokens(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;

        let session = self
            .ctx
            .session_store()
            .take_refresh(&claims.jti)
            .ok_or_else(|| {
                warn!(sub = %claims.sub, "Refresh failed: token unknown or already used");
                AppError::InvalidToken
            })?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(session.user_id)
            .await?
            .filter(User::is_active)
            .ok_or(AppError::InvalidToken)?;

        info!(user_id = %user.id, "Tokens refreshed successfully");

        self.issue_tokens(&user, false)
    }

    /// Revoke the presented access token and the user's refresh tokens
    ///
    /// With a `refresh_token` only that session ends; otherwise every refresh
    /// token of the user is revoked.
    #[instrument(skip(self, claims, request), fields(user_id = %claims.sub))]
    pub async fn logout(&self, claims: &Claims, request: LogoutRequest) -> ServiceResult<()> {
        let user_id = claims.user_id()?;
        let store = self.ctx.session_store();

        match request.refresh_token {
            Some(token) => {
                let refresh = self.ctx.jwt_service().validate_refresh_token(&token)?;
                if refresh.user_id()? != user_id {
                    warn!("Logout rejected: refresh token belongs to another user");
                    return Err(AppError::InvalidToken.into());
                }
                store.revoke_refresh(&refresh.jti);
            }
            None => {
                store.revoke_all_for_user(user_id);
            }
        }

        store.revoke_access(&claims.jti, claims.exp);

        info!(user_id = %user_id, "User logged out successfully");
        Ok(())
    }

    /// Validate an access token for an incoming request
    ///
    /// Rejects revoked tokens and tokens whose user no longer exists or is inactive.
    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: &str) -> ServiceResult<Claims> {
        let claims = self.ctx.jwt_service().validate_access_token(token)?;

        if self.ctx.session_store().is_revoked(&claims.jti) {
            return Err(AppError::TokenRevoked.into());
        }

        let user_id = claims.user_id()?;
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .filter(User::is_active)
            .ok_or(AppError::InvalidToken)?;

        Ok(claims)
    }

    /// Describe an already authenticated access token
    pub fn verify(&self, claims: &Claims) -> ServiceResult<VerifyResponse> {
        Ok(VerifyResponse {
            valid: true,
            user_id: claims.user_id()?,
            username: claims.username.clone(),
            role: claims.role.clone(),
            fresh: claims.fresh,
            expires_at: claims.exp,
        })
    }

    fn issue_tokens(&self, user: &User, fresh: bool) -> ServiceResult<AuthResponse> {
        let subject = TokenSubject {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
        };

        let pair = self.ctx.jwt_service().generate_token_pair(&subject, fresh)?;

        self.ctx.session_store().store_refresh(
            &pair.refresh_jti,
            RefreshSession::new(user.id, pair.refresh_expires_at),
        );

        Ok(AuthResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
            user_id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
        })
    }
}
