//! Route definitions
//!
//! All API routes organized by domain and mounted under /api.

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{self, auth, health, rooms, users};
use crate::state::AppState;

/// Create the main API router (health routes are merged separately)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        .fallback(handlers::fallback)
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(room_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/verify", get(auth::verify).post(auth::verify))
        .route(
            "/auth/me",
            get(users::get_current_user).put(users::update_current_user),
        )
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/user/me",
            get(users::get_current_user).patch(users::update_current_user),
        )
        .route("/user/:user_id", get(users::get_user))
        .route("/users/search", get(users::search_users))
}

/// Room routes
fn room_routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(rooms::list_rooms).post(rooms::create_room))
        .route("/rooms/public", get(rooms::list_public_rooms))
        .route(
            "/rooms/:room_id",
            get(rooms::get_room)
                .put(rooms::update_room)
                .patch(rooms::update_room)
                .delete(rooms::delete_room),
        )
        .route("/rooms/:room_id/join", post(rooms::join_room))
        .route("/rooms/:room_id/leave", post(rooms::leave_room))
        .route(
            "/rooms/:room_id/members",
            get(rooms::list_members).post(rooms::add_member),
        )
        .route(
            "/rooms/:room_id/members/:user_id",
            delete(rooms::remove_member),
        )
}
