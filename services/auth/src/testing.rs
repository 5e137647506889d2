//! Shared fixtures for unit tests

use common::database::{ConnectionPool, DatabaseConfig};
use std::time::Duration;
use tempfile::TempDir;

use crate::repositories::UserRepository;

/// Pool over a fresh SQLite file with the users table in place.
///
/// The returned directory must outlive the pool.
pub async fn sqlite_pool(max_connections: u32) -> (TempDir, ConnectionPool) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", dir.path().join("users.db").display()),
        max_connections,
        acquire_timeout: Duration::from_secs(10),
    };

    let pool = ConnectionPool::init(&config)
        .await
        .expect("Failed to initialize test pool");
    UserRepository::new(pool.clone())
        .ensure_schema()
        .await
        .expect("Failed to create users table");

    (dir, pool)
}
