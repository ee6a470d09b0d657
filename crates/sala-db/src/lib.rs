//! # sala-db
//!
//! Database layer implementing repository traits with SQLite via SQLx.
//!
//! ## Overview
//!
//! This crate provides SQLite implementations for all repository traits
//! defined in `sala-core`. It handles:
//!
//! - Connection pool management and the embedded schema
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sala_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use sala_db::repositories::SqliteUserRepository;
//! use sala_core::traits::UserRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!     let user_repo = SqliteUserRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, ping, run_migrations, DatabaseConfig, SqlitePool};
pub use repositories::{SqliteMemberRepository, SqliteRoomRepository, SqliteUserRepository};
