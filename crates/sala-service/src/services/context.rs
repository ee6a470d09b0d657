//! Service context - dependency container for services
//!
//! Holds all repositories, the session store, and other dependencies needed by services.

use std::sync::Arc;

use sala_common::auth::JwtService;
use sala_core::traits::{MemberRepository, RoomRepository, UserRepository};
use sala_db::{SqliteMemberRepository, SqlitePool, SqliteRoomRepository, SqliteUserRepository};

use crate::session::SessionStore;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - The in-process session store
/// - JWT service for authentication
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool
    pool: SqlitePool,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    room_repo: Arc<dyn RoomRepository>,
    member_repo: Arc<dyn MemberRepository>,

    // Sessions
    session_store: Arc<SessionStore>,

    // Services
    jwt_service: Arc<JwtService>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        pool: SqlitePool,
        user_repo: Arc<dyn UserRepository>,
        room_repo: Arc<dyn RoomRepository>,
        member_repo: Arc<dyn MemberRepository>,
        session_store: Arc<SessionStore>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            pool,
            user_repo,
            room_repo,
            member_repo,
            session_store,
            jwt_service,
        }
    }

    /// Wire the SQLite repositories over a single pool
    pub fn from_pool(pool: SqlitePool, jwt_service: JwtService) -> Self {
        Self::new(
            pool.clone(),
            Arc::new(SqliteUserRepository::new(pool.clone())),
            Arc::new(SqliteRoomRepository::new(pool.clone())),
            Arc::new(SqliteMemberRepository::new(pool)),
            Arc::new(SessionStore::new()),
            Arc::new(jwt_service),
        )
    }

    // === Database Pool ===

    /// Get the SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn room_repo(&self) -> &dyn RoomRepository {
        self.room_repo.as_ref()
    }

    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    // === Sessions ===

    /// Get the refresh-token / revocation store
    pub fn session_store(&self) -> &SessionStore {
        self.session_store.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"SqlitePool")
            .field("repositories", &"...")
            .field("jwt_service", &self.jwt_service)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<SqlitePool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    room_repo: Option<Arc<dyn RoomRepository>>,
    member_repo: Option<Arc<dyn MemberRepository>>,
    session_store: Option<Arc<SessionStore>>,
    jwt_service: Option<Arc<JwtService>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: SqlitePool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn room_repo(mut self, repo: Arc<dyn RoomRepository>) -> Self {
        self.room_repo = Some(repo);
        self
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn session_store(mut self, store: Arc<SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    /// Build the ServiceContext
    ///
    /// A missing session store is replaced by an empty one.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.pool
                .ok_or_else(|| ServiceError::validation("pool is required"))?,
            self.user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            self.room_repo
                .ok_or_else(|| ServiceError::validation("room_repo is required"))?,
            self.member_repo
                .ok_or_else(|| ServiceError::validation("member_repo is required"))?,
            self.session_store.unwrap_or_default(),
            self.jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
        ))
    }
}
