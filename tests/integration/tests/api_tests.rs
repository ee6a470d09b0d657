//! API Integration Tests
//!
//! Every test starts its own server on an ephemeral port with a private
//! in-memory SQLite database, so no external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, fixtures::*, test_config, TestServer,
};
use reqwest::StatusCode;
use serde_json::json;

async fn start() -> TestServer {
    TestServer::start().await.expect("Failed to start server")
}

async fn register_named(server: &TestServer, username: &str) -> AuthResponse {
    let request = RegisterRequest {
        username: username.to_string(),
        password: TEST_PASSWORD.to_string(),
    };
    let response = server.post("/api/auth/register", &request).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn create_room(
    server: &TestServer,
    token: &str,
    request: &CreateRoomRequest,
) -> RoomResponse {
    let response = server.post_auth("/api/rooms", token, request).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = start().await;
    let response = server.get("/health").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));

    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready() {
    let server = start().await;
    let response = server.get("/health/ready").await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let server = start().await;
    let response = server
        .client
        .get(format!("{}/health", server.base_url()))
        .header("x-request-id", "req-abc-123")
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-abc-123");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_user() {
    let server = start().await;
    let (request, auth) = server.register_unique().await.unwrap();

    assert_eq!(auth.username, request.username);
    assert_eq!(auth.token_type, "Bearer");
    assert_eq!(auth.role, "user");
    assert!(auth.user_id > 0);
    assert!(auth.expires_in > 0);
    assert!(!auth.access_token.is_empty());
    assert!(!auth.refresh_token.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let server = start().await;
    let (request, _) = server.register_unique().await.unwrap();

    let response = server.post("/api/auth/register", &request).await.unwrap();
    assert_error(response, StatusCode::CONFLICT, "USERNAME_TAKEN")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_register_weak_password() {
    let server = start().await;
    let request = RegisterRequest {
        password: "soloLetras".to_string(),
        ..RegisterRequest::unique()
    };

    let response = server.post("/api/auth/register", &request).await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "WEAK_PASSWORD")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_register_invalid_username() {
    let server = start().await;
    let request = RegisterRequest {
        username: "con espacio".to_string(),
        password: TEST_PASSWORD.to_string(),
    };

    let response = server.post("/api/auth/register", &request).await.unwrap();
    let body: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "VALIDATION_ERROR");
    assert!(body.error.details.is_some());
}

#[tokio::test]
async fn test_login() {
    let server = start().await;
    let (register_req, registered) = server.register_unique().await.unwrap();

    let login_req = LoginRequest::from_register(&register_req);
    let response = server.post("/api/auth/login", &login_req).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(auth.user_id, registered.user_id);
    assert_eq!(auth.username, register_req.username);

    // a password login mints a fresh access token
    let response = server
        .get_auth("/api/auth/verify", &auth.access_token)
        .await
        .unwrap();
    let verify: VerifyResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(verify.fresh);
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = start().await;
    let (register_req, _) = server.register_unique().await.unwrap();

    let wrong_password = LoginRequest {
        username: register_req.username.clone(),
        password: "Incorrecta99".to_string(),
    };
    let response = server.post("/api/auth/login", &wrong_password).await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")
        .await
        .unwrap();

    let unknown_user = LoginRequest {
        username: "nadie_aqui".to_string(),
        password: TEST_PASSWORD.to_string(),
    };
    let response = server.post("/api/auth/login", &unknown_user).await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_refresh_token_rotation() {
    let server = start().await;
    let (_, auth) = server.register_unique().await.unwrap();

    let refresh_req = RefreshTokenRequest {
        refresh_token: auth.refresh_token.clone(),
    };
    let response = server.post("/api/auth/refresh", &refresh_req).await.unwrap();
    let refreshed: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_ne!(refreshed.refresh_token, auth.refresh_token);

    // refreshed access tokens are not fresh
    let response = server
        .get_auth("/api/auth/verify", &refreshed.access_token)
        .await
        .unwrap();
    let verify: VerifyResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!verify.fresh);

    // the old refresh token was consumed
    let response = server.post("/api/auth/refresh", &refresh_req).await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_TOKEN")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_refresh_token_cannot_authenticate() {
    let server = start().await;
    let (_, auth) = server.register_unique().await.unwrap();

    let response = server
        .get_auth("/api/user/me", &auth.refresh_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_TOKEN")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_verify_token() {
    let server = start().await;
    let (request, auth) = server.register_unique().await.unwrap();

    let response = server
        .get_auth("/api/auth/verify", &auth.access_token)
        .await
        .unwrap();
    let verify: VerifyResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(verify.valid);
    assert!(verify.fresh);
    assert_eq!(verify.user_id, auth.user_id);
    assert_eq!(verify.username, request.username);
    assert_eq!(verify.role, "user");
    assert!(verify.expires_at > 0);

    let response = server
        .post_auth_empty("/api/auth/verify", &auth.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_logout_revokes_tokens() {
    let server = start().await;
    let (_, auth) = server.register_unique().await.unwrap();

    let response = server
        .post_auth_empty("/api/auth/logout", &auth.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth("/api/user/me", &auth.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "TOKEN_REVOKED")
        .await
        .unwrap();

    let refresh_req = RefreshTokenRequest {
        refresh_token: auth.refresh_token,
    };
    let response = server.post("/api/auth/refresh", &refresh_req).await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_TOKEN")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_logout_single_session() {
    let server = start().await;
    let (register_req, first) = server.register_unique().await.unwrap();

    let response = server
        .post("/api/auth/login", &LoginRequest::from_register(&register_req))
        .await
        .unwrap();
    let second: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();

    let body = LogoutRequest {
        refresh_token: Some(first.refresh_token),
    };
    let response = server
        .post_auth("/api/auth/logout", &first.access_token, &body)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    // the second session is untouched
    let response = server
        .get_auth("/api/user/me", &second.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let refresh_req = RefreshTokenRequest {
        refresh_token: second.refresh_token,
    };
    let response = server.post("/api/auth/refresh", &refresh_req).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_logout_rejects_malformed_body() {
    let server = start().await;
    let (_, auth) = server.register_unique().await.unwrap();
    let url = format!("{}/api/auth/logout", server.base_url());

    let response = server
        .client
        .post(&url)
        .bearer_auth(&auth.access_token)
        .json(&json!({ "refresh_token": 123 }))
        .send()
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_BODY")
        .await
        .unwrap();

    let response = server
        .client
        .post(&url)
        .bearer_auth(&auth.access_token)
        .body(r#"{"refresh_token":"x"}"#)
        .send()
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_BODY")
        .await
        .unwrap();

    // nothing was revoked
    let response = server
        .get_auth("/api/user/me", &auth.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let refresh_req = RefreshTokenRequest {
        refresh_token: auth.refresh_token,
    };
    let response = server.post("/api/auth/refresh", &refresh_req).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_missing_authorization() {
    let server = start().await;

    for path in ["/api/user/me", "/api/rooms", "/api/users/search?query=a"] {
        let response = server.get(path).await.unwrap();
        assert_error(response, StatusCode::UNAUTHORIZED, "MISSING_AUTHORIZATION")
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_garbage_token() {
    let server = start().await;
    let response = server.get_auth("/api/user/me", "abc.def.ghi").await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_TOKEN")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_token_from_other_server_is_rejected() {
    let other = TestServer::start_with_config(
        test_config(&[("JWT_SECRET", "a-completely-different-secret-for-tests")]).unwrap(),
    )
    .await
    .unwrap();
    let (_, auth) = other.register_unique().await.unwrap();

    let server = start().await;
    let response = server
        .get_auth("/api/user/me", &auth.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_TOKEN")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_auth_me_aliases() {
    let server = start().await;
    let (request, auth) = server.register_unique().await.unwrap();

    let response = server.get_auth("/api/auth/me", &auth.access_token).await.unwrap();
    let me: CurrentUserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.username, request.username);

    let new_name = format!("{}_b", request.username);
    let body = UpdateUserRequest {
        username: Some(new_name.clone()),
        ..Default::default()
    };
    let response = server
        .put_auth("/api/auth/me", &auth.access_token, &body)
        .await
        .unwrap();
    let me: CurrentUserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.username, new_name);
}

// ============================================================================
// User Tests
// ============================================================================

#[tokio::test]
async fn test_get_current_user() {
    let server = start().await;
    let (request, auth) = server.register_unique().await.unwrap();

    let response = server.get_auth("/api/user/me", &auth.access_token).await.unwrap();
    let me: CurrentUserResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(me.id, auth.user_id);
    assert_eq!(me.username, request.username);
    assert_eq!(me.role, "user");
    assert!(me.active);
    assert!(!me.created_at.is_empty());
    assert!(!me.updated_at.is_empty());
}

#[tokio::test]
async fn test_update_username() {
    let server = start().await;
    let (request, auth) = server.register_unique().await.unwrap();
    let (taken, _) = server.register_unique().await.unwrap();

    let body = UpdateUserRequest {
        username: Some(taken.username),
        ..Default::default()
    };
    let response = server
        .patch_auth("/api/user/me", &auth.access_token, &body)
        .await
        .unwrap();
    assert_error(response, StatusCode::CONFLICT, "USERNAME_TAKEN")
        .await
        .unwrap();

    let new_name = format!("{}.nuevo", request.username);
    let body = UpdateUserRequest {
        username: Some(new_name.clone()),
        ..Default::default()
    };
    let response = server
        .patch_auth("/api/user/me", &auth.access_token, &body)
        .await
        .unwrap();
    let me: CurrentUserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.username, new_name);

    let login = LoginRequest {
        username: new_name,
        password: TEST_PASSWORD.to_string(),
    };
    let response = server.post("/api/auth/login", &login).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_update_empty_body_is_noop() {
    let server = start().await;
    let (request, auth) = server.register_unique().await.unwrap();

    let response = server
        .patch_auth("/api/user/me", &auth.access_token, &json!({}))
        .await
        .unwrap();
    let me: CurrentUserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.username, request.username);
}

#[tokio::test]
async fn test_password_change_requires_fresh_token() {
    let server = start().await;
    let (request, auth) = server.register_unique().await.unwrap();

    let refresh_req = RefreshTokenRequest {
        refresh_token: auth.refresh_token.clone(),
    };
    let response = server.post("/api/auth/refresh", &refresh_req).await.unwrap();
    let stale: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();

    let body = UpdateUserRequest {
        password: Some("OtraClave456".to_string()),
        ..Default::default()
    };
    let response = server
        .patch_auth("/api/user/me", &stale.access_token, &body)
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "FRESH_TOKEN_REQUIRED")
        .await
        .unwrap();

    let response = server
        .patch_auth("/api/user/me", &auth.access_token, &body)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let old_login = LoginRequest::from_register(&request);
    let response = server.post("/api/auth/login", &old_login).await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")
        .await
        .unwrap();

    let new_login = LoginRequest {
        username: request.username,
        password: "OtraClave456".to_string(),
    };
    let response = server.post("/api/auth/login", &new_login).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_password_change_too_short() {
    let server = start().await;
    let (_, auth) = server.register_unique().await.unwrap();

    let body = UpdateUserRequest {
        password: Some("a1".to_string()),
        ..Default::default()
    };
    let response = server
        .patch_auth("/api/user/me", &auth.access_token, &body)
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_user_by_id() {
    let server = start().await;
    let (_, viewer) = server.register_unique().await.unwrap();
    let (target_req, target) = server.register_unique().await.unwrap();

    let response = server
        .get_auth(&format!("/api/user/{}", target.user_id), &viewer.access_token)
        .await
        .unwrap();
    let user: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user["id"], target.user_id);
    assert_eq!(user["username"], target_req.username.as_str());
    assert_eq!(user["role"], "user");
    // public profile only
    assert!(user.get("active").is_none());
}

#[tokio::test]
async fn test_get_unknown_user() {
    let server = start().await;
    let (_, auth) = server.register_unique().await.unwrap();

    let response = server
        .get_auth("/api/user/999999", &auth.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "UNKNOWN_USER")
        .await
        .unwrap();

    let response = server
        .get_auth("/api/user/abc", &auth.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_PATH_PARAMETER")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_search_users() {
    let server = start().await;
    let auth = register_named(&server, "buscador").await;
    register_named(&server, "marta_g").await;
    register_named(&server, "MartaG").await;
    register_named(&server, "martin").await;
    register_named(&server, "lucia").await;

    let response = server
        .get_auth("/api/users/search?query=MART", &auth.access_token)
        .await
        .unwrap();
    let users: Vec<PublicUserResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names.len(), 3);
    assert!(!names.contains(&"lucia"));

    let response = server
        .get_auth("/api/users/search?query=mart&limit=2", &auth.access_token)
        .await
        .unwrap();
    let users: Vec<PublicUserResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(users.len(), 2);

    // `_` is matched literally
    let response = server
        .get_auth("/api/users/search?query=a_g", &auth.access_token)
        .await
        .unwrap();
    let users: Vec<PublicUserResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "marta_g");

    let response = server
        .get_auth("/api/users/search?query=%25", &auth.access_token)
        .await
        .unwrap();
    let users: Vec<PublicUserResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_search_users_invalid_query() {
    let server = start().await;
    let (_, auth) = server.register_unique().await.unwrap();

    for path in [
        "/api/users/search",
        "/api/users/search?query=",
        "/api/users/search?query=%20%20",
        "/api/users/search?query=ana&limit=muchos",
    ] {
        let response = server.get_auth(path, &auth.access_token).await.unwrap();
        assert_error(response, StatusCode::BAD_REQUEST, "INVALID_QUERY_PARAMETER")
            .await
            .unwrap();
    }
}

// ============================================================================
// Room Tests
// ============================================================================

#[tokio::test]
async fn test_create_room_defaults_to_private() {
    let server = start().await;
    let (_, auth) = server.register_unique().await.unwrap();
    let request = CreateRoomRequest::unique();

    let room = create_room(&server, &auth.access_token, &request).await;
    assert_eq!(room.nombre, request.nombre);
    assert!(room.privada);
    assert!(room.id > 0);
}

#[tokio::test]
async fn test_create_room_invalid_name() {
    let server = start().await;
    let (_, auth) = server.register_unique().await.unwrap();

    let blank = CreateRoomRequest {
        nombre: "   ".to_string(),
        privada: None,
    };
    let response = server
        .post_auth("/api/rooms", &auth.access_token, &blank)
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_ROOM_NAME")
        .await
        .unwrap();

    let too_long = CreateRoomRequest {
        nombre: "x".repeat(101),
        privada: None,
    };
    let response = server
        .post_auth("/api/rooms", &auth.access_token, &too_long)
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_ROOM_NAME")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_room_name_length_counts_trimmed_text() {
    let server = start().await;
    let (_, auth) = server.register_unique().await.unwrap();

    let padded = CreateRoomRequest {
        nombre: format!("Amigos{}", " ".repeat(95)),
        privada: None,
    };
    let room = create_room(&server, &auth.access_token, &padded).await;
    assert_eq!(room.nombre, "Amigos");

    let update = UpdateRoomRequest {
        nombre: Some(format!("   {}   ", "y".repeat(100))),
        privada: None,
    };
    let response = server
        .patch_auth(&format!("/api/rooms/{}", room.id), &auth.access_token, &update)
        .await
        .unwrap();
    let updated: RoomResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.nombre, "y".repeat(100));
}

#[tokio::test]
async fn test_list_my_rooms() {
    let server = start().await;
    let (_, auth) = server.register_unique().await.unwrap();
    let (_, other) = server.register_unique().await.unwrap();

    let first = create_room(&server, &auth.access_token, &CreateRoomRequest::unique()).await;
    let second = create_room(&server, &auth.access_token, &CreateRoomRequest::public()).await;
    create_room(&server, &other.access_token, &CreateRoomRequest::unique()).await;

    let response = server.get_auth("/api/rooms", &auth.access_token).await.unwrap();
    let rooms: Vec<JoinedRoomResponse> = assert_json(response, StatusCode::OK).await.unwrap();

    let ids: Vec<_> = rooms.iter().map(|r| r.id).collect();
    assert_eq!(ids, [first.id, second.id]);
    assert!(rooms.iter().all(|r| r.role == "admin"));
}

#[tokio::test]
async fn test_get_room_detail() {
    let server = start().await;
    let (_, auth) = server.register_unique().await.unwrap();
    let room = create_room(&server, &auth.access_token, &CreateRoomRequest::unique()).await;

    let response = server
        .get_auth(&format!("/api/rooms/{}", room.id), &auth.access_token)
        .await
        .unwrap();
    let detail: RoomDetailResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(detail.id, room.id);
    assert_eq!(detail.nombre, room.nombre);
    assert_eq!(detail.member_count, 1);
    assert_eq!(detail.role.as_deref(), Some("admin"));
}

#[tokio::test]
async fn test_private_room_is_hidden() {
    let server = start().await;
    let (_, owner) = server.register_unique().await.unwrap();
    let (_, outsider) = server.register_unique().await.unwrap();
    let room = create_room(&server, &owner.access_token, &CreateRoomRequest::unique()).await;

    let response = server
        .get_auth(&format!("/api/rooms/{}", room.id), &outsider.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "UNKNOWN_ROOM")
        .await
        .unwrap();

    let response = server
        .post_auth_empty(&format!("/api/rooms/{}/join", room.id), &outsider.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "UNKNOWN_ROOM")
        .await
        .unwrap();

    let response = server
        .get_auth(&format!("/api/rooms/{}/members", room.id), &outsider.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "UNKNOWN_ROOM")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_room_invalid_id() {
    let server = start().await;
    let (_, auth) = server.register_unique().await.unwrap();

    let response = server.get_auth("/api/rooms/abc", &auth.access_token).await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_PATH_PARAMETER")
        .await
        .unwrap();

    let response = server.get_auth("/api/rooms/424242", &auth.access_token).await.unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "UNKNOWN_ROOM")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_public_rooms_and_join() {
    let server = start().await;
    let (_, owner) = server.register_unique().await.unwrap();
    let (joiner_req, joiner) = server.register_unique().await.unwrap();

    let public = create_room(&server, &owner.access_token, &CreateRoomRequest::public()).await;
    create_room(&server, &owner.access_token, &CreateRoomRequest::unique()).await;

    let response = server
        .get_auth("/api/rooms/public", &joiner.access_token)
        .await
        .unwrap();
    let rooms: Vec<RoomResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].id, public.id);
    assert!(!rooms[0].privada);

    let response = server
        .get_auth(&format!("/api/rooms/{}", public.id), &joiner.access_token)
        .await
        .unwrap();
    let detail: RoomDetailResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(detail.role.is_none());

    let join_path = format!("/api/rooms/{}/join", public.id);
    let response = server
        .post_auth_empty(&join_path, &joiner.access_token)
        .await
        .unwrap();
    let member: MemberResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(member.room_id, public.id);
    assert_eq!(member.user_id, joiner.user_id);
    assert_eq!(member.username, joiner_req.username);
    assert_eq!(member.role, "member");

    let response = server
        .post_auth_empty(&join_path, &joiner.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::CONFLICT, "ALREADY_MEMBER")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_room_admin_operations() {
    let server = start().await;
    let (_, owner) = server.register_unique().await.unwrap();
    let (_, member) = server.register_unique().await.unwrap();
    let room = create_room(&server, &owner.access_token, &CreateRoomRequest::public()).await;
    let room_path = format!("/api/rooms/{}", room.id);

    server
        .post_auth_empty(&format!("{room_path}/join"), &member.access_token)
        .await
        .unwrap();

    let update = UpdateRoomRequest {
        nombre: Some("Renombrada".to_string()),
        privada: Some(true),
    };
    let response = server
        .patch_auth(&room_path, &member.access_token, &update)
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "NOT_ROOM_ADMIN")
        .await
        .unwrap();

    let response = server
        .put_auth(&room_path, &owner.access_token, &update)
        .await
        .unwrap();
    let updated: RoomResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.nombre, "Renombrada");
    assert!(updated.privada);

    let response = server.delete_auth(&room_path, &member.access_token).await.unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "NOT_ROOM_ADMIN")
        .await
        .unwrap();

    let response = server.delete_auth(&room_path, &owner.access_token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get_auth(&room_path, &owner.access_token).await.unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "UNKNOWN_ROOM")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_room_membership_management() {
    let server = start().await;
    let (_, owner) = server.register_unique().await.unwrap();
    let (_, guest) = server.register_unique().await.unwrap();
    let room = create_room(&server, &owner.access_token, &CreateRoomRequest::unique()).await;
    let members_path = format!("/api/rooms/{}/members", room.id);

    let add = AddMemberRequest {
        user_id: guest.user_id,
    };
    let response = server
        .post_auth(&members_path, &guest.access_token, &add)
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "UNKNOWN_ROOM")
        .await
        .unwrap();

    let response = server
        .post_auth(&members_path, &owner.access_token, &add)
        .await
        .unwrap();
    let member: MemberResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(member.user_id, guest.user_id);

    let response = server
        .post_auth(&members_path, &owner.access_token, &add)
        .await
        .unwrap();
    assert_error(response, StatusCode::CONFLICT, "ALREADY_MEMBER")
        .await
        .unwrap();

    let response = server
        .post_auth(&members_path, &owner.access_token, &AddMemberRequest { user_id: 999_999 })
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "UNKNOWN_USER")
        .await
        .unwrap();

    // the private room is now visible to the guest
    let response = server.get_auth(&members_path, &guest.access_token).await.unwrap();
    let members: Vec<MemberResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let ids: Vec<_> = members.iter().map(|m| m.user_id).collect();
    assert_eq!(ids, [owner.user_id, guest.user_id]);
    assert_eq!(members[0].role, "admin");

    let response = server
        .delete_auth(&format!("{members_path}/{}", owner.user_id), &guest.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "NOT_ROOM_ADMIN")
        .await
        .unwrap();

    let response = server
        .delete_auth(&format!("{members_path}/{}", guest.user_id), &owner.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth(&format!("/api/rooms/{}", room.id), &guest.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "UNKNOWN_ROOM")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_leave_room_promotes_oldest_member() {
    let server = start().await;
    let (_, owner) = server.register_unique().await.unwrap();
    let (_, first) = server.register_unique().await.unwrap();
    let (_, second) = server.register_unique().await.unwrap();
    let room = create_room(&server, &owner.access_token, &CreateRoomRequest::public()).await;
    let room_path = format!("/api/rooms/{}", room.id);

    for token in [&first.access_token, &second.access_token] {
        let response = server
            .post_auth_empty(&format!("{room_path}/join"), token)
            .await
            .unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }

    let response = server
        .post_auth_empty(&format!("{room_path}/leave"), &owner.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get_auth(&room_path, &first.access_token).await.unwrap();
    let detail: RoomDetailResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(detail.member_count, 2);
    assert_eq!(detail.role.as_deref(), Some("admin"));

    let response = server
        .post_auth_empty(&format!("{room_path}/leave"), &owner.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "UNKNOWN_MEMBER")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_last_member_leaving_deletes_room() {
    let server = start().await;
    let (_, owner) = server.register_unique().await.unwrap();
    let room = create_room(&server, &owner.access_token, &CreateRoomRequest::public()).await;

    let response = server
        .post_auth_empty(&format!("/api/rooms/{}/leave", room.id), &owner.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth(&format!("/api/rooms/{}", room.id), &owner.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "UNKNOWN_ROOM")
        .await
        .unwrap();

    let response = server.get_auth("/api/rooms", &owner.access_token).await.unwrap();
    let rooms: Vec<JoinedRoomResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(rooms.is_empty());
}

// ============================================================================
// Rate Limiting Tests
// ============================================================================

#[tokio::test]
async fn test_rate_limit() {
    let config = test_config(&[
        ("RATE_LIMIT_ENABLED", "true"),
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "1"),
        ("RATE_LIMIT_BURST", "2"),
    ])
    .unwrap();
    let server = TestServer::start_with_config(config).await.unwrap();

    let mut statuses = Vec::new();
    for _ in 0..5 {
        statuses.push(server.get("/api/user/me").await.unwrap().status());
    }
    assert!(statuses.contains(&StatusCode::TOO_MANY_REQUESTS));

    // health probes are never throttled
    for _ in 0..5 {
        let response = server.get("/health").await.unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }
}
