//! Common library for the credential services
//!
//! This crate provides shared functionality used across services, namely the
//! pooled database connectivity and the storage error taxonomy.

pub mod database;
pub mod error;

/// Example usage of the database module
///
/// ```rust,no_run
/// use common::database::{ConnectionPool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig::from_env()?;
///     let pool = ConnectionPool::init(&config).await?;
///     let is_healthy = pool.health_check().await?;
///     println!("Database health check: {}", is_healthy);
///     pool.close().await;
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
