//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AddMemberRequest, CreateRoomRequest, LoginRequest, LogoutRequest, RefreshTokenRequest,
    RegisterRequest, SearchUsersQuery, UpdateRoomRequest, UpdateUserRequest,
};

pub use responses::{
    AuthResponse, CurrentUserResponse, HealthChecks, HealthResponse, JoinedRoomResponse,
    MemberResponse, PublicUserResponse, ReadinessResponse, RoomDetailResponse, RoomResponse,
    VerifyResponse,
};

pub use mappers::MemberWithUser;
