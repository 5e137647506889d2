//! User repository for database operations

use common::{
    database::ConnectionPool,
    error::{DatabaseError, DatabaseResult},
};
use tracing::{debug, info};

use crate::models::User;

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        username VARCHAR(255) PRIMARY KEY,
        password_hash VARCHAR(255) NOT NULL
    )
"#;

/// User repository
#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: ConnectionPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Create the `users` table if it does not exist yet
    pub async fn ensure_schema(&self) -> DatabaseResult<()> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query(CREATE_USERS_TABLE)
            .execute(conn.as_connection())
            .await;
        self.pool.settle(conn, &result).await;

        result.map_err(DatabaseError::classify)?;
        info!("Users table is ready");
        Ok(())
    }

    /// Insert a new user record in a single statement.
    ///
    /// The primary key on `username` rejects duplicates, surfaced as
    /// [`DatabaseError::UniqueViolation`].
    pub async fn insert(&self, username: &str, password_hash: &str) -> DatabaseResult<()> {
        debug!("Inserting user: {}", username);

        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .execute(conn.as_connection())
        .await;
        self.pool.settle(conn, &result).await;

        result.map_err(DatabaseError::classify)?;
        Ok(())
    }

    /// Find a user by exact, case-sensitive username
    pub async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        debug!("Finding user by username: {}", username);

        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query_as::<_, User>(
            r#"
            SELECT username, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(conn.as_connection())
        .await;
        self.pool.settle(conn, &result).await;

        result.map_err(DatabaseError::classify)
    }

    /// Number of stored user records
    #[cfg(test)]
    pub async fn count(&self) -> DatabaseResult<i64> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(conn.as_connection())
            .await;
        self.pool.settle(conn, &result).await;

        result.map_err(DatabaseError::classify)
    }
}
