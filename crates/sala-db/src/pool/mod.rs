//! Database connection pool management

mod sqlite;

pub use sqlite::{create_pool, ping, run_migrations, DatabaseConfig};

// Re-export SqlitePool for convenience
pub use sqlx::sqlite::SqlitePool;
