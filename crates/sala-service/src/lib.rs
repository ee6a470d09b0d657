//! # sala-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;
pub mod session;

pub use services::{
    AuthService, RoomService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    UserService,
};
pub use session::{RefreshSession, SessionStore};
