//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests.
//! Every server gets its own in-memory database.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use sala_api::{create_app, create_app_state};
use sala_common::AppConfig;
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{AuthResponse, ErrorResponse, RegisterRequest};

/// Secret used by every test server
pub const TEST_JWT_SECRET: &str = "integration-tests-secret-0123456789abcdef";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config(&[])?).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state);

        // port 0 lets the OS pick a free port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    fn bearer(builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.header("Authorization", format!("Bearer {token}"))
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(Self::bearer(self.client.get(self.url(path)), token)
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// Make a POST request with auth token
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(Self::bearer(self.client.post(self.url(path)), token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a POST request with auth token and no body
    pub async fn post_auth_empty(&self, path: &str, token: &str) -> Result<Response> {
        Ok(Self::bearer(self.client.post(self.url(path)), token)
            .send()
            .await?)
    }

    /// Make a PATCH request with auth token
    pub async fn patch_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(Self::bearer(self.client.patch(self.url(path)), token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a PUT request with auth token
    pub async fn put_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(Self::bearer(self.client.put(self.url(path)), token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a DELETE request with auth token
    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(Self::bearer(self.client.delete(self.url(path)), token)
            .send()
            .await?)
    }

    /// Register a fresh user with a unique username
    pub async fn register_unique(&self) -> Result<(RegisterRequest, AuthResponse)> {
        let request = RegisterRequest::unique();
        let response = self.post("/api/auth/register", &request).await?;
        let auth = assert_json(response, StatusCode::CREATED).await?;
        Ok((request, auth))
    }
}

/// Create a test configuration
///
/// Uses an in-memory database and disables rate limiting; `overrides`
/// replace individual variables.
pub fn test_config(overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let config = AppConfig::from_lookup(|key| {
        if let Some((_, value)) = overrides.iter().find(|(k, _)| *k == key) {
            return Some((*value).to_string());
        }
        match key {
            "JWT_SECRET" => Some(TEST_JWT_SECRET.to_string()),
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            "RATE_LIMIT_ENABLED" => Some("false".to_string()),
            _ => None,
        }
    })
    .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

    Ok(config)
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error response with the given status and error code
pub async fn assert_error(
    response: Response,
    expected_status: StatusCode,
    expected_code: &str,
) -> Result<()> {
    let body: ErrorResponse = assert_json(response, expected_status).await?;
    if body.error.code != expected_code {
        anyhow::bail!(
            "Expected error code {expected_code}, got {} ({})",
            body.error.code,
            body.error.message
        );
    }
    Ok(())
}
