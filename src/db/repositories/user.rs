//! User repository
//!
//! Database operations for user accounts.
//!
//! This module provides:
//! - `UserRepository` trait defining the interface for user data access
//! - `SqlxUserRepository` implementing the trait for SQLite and MySQL

use crate::config::DatabaseDriver;
use crate::db::{mysql_pool, sqlite_pool, DynDatabasePool};
use crate::models::User;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user
    async fn create(&self, user: &User) -> Result<User>;

    /// Get user by username
    async fn get_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Count users registered under a username (0 or 1)
    async fn count_by_username(&self, username: &str) -> Result<i64>;
}

/// SQLx-based user repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxUserRepository {
    pool: DynDatabasePool,
}

impl SqlxUserRepository {
    /// Create a new SQLx user repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_user_sqlite(sqlite_pool(&self.pool)?, user).await,
            DatabaseDriver::Mysql => create_user_mysql(mysql_pool(&self.pool)?, user).await,
        }
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_user_by_username_sqlite(sqlite_pool(&self.pool)?, username).await
            }
            DatabaseDriver::Mysql => {
                get_user_by_username_mysql(mysql_pool(&self.pool)?, username).await
            }
        }
    }

    async fn count_by_username(&self, username: &str) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                count_by_username_sqlite(sqlite_pool(&self.pool)?, username).await
            }
            DatabaseDriver::Mysql => {
                count_by_username_mysql(mysql_pool(&self.pool)?, username).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_user_sqlite(pool: &SqlitePool, user: &User) -> Result<User> {
    sqlx::query("INSERT INTO users (Username, HashedPass) VALUES (?, ?)")
        .bind(&user.username)
        .bind(&user.hashed_password)
        .execute(pool)
        .await
        .context("Failed to create user")?;

    Ok(user.clone())
}

async fn get_user_by_username_sqlite(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let row = sqlx::query("SELECT Username, HashedPass FROM users WHERE Username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by username")?;

    Ok(row.map(|row| User {
        username: row.get("Username"),
        hashed_password: row.get("HashedPass"),
    }))
}

async fn count_by_username_sqlite(pool: &SqlitePool, username: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE Username = ?")
        .bind(username)
        .fetch_one(pool)
        .await
        .context("Failed to count users")?;

    Ok(count)
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_user_mysql(pool: &MySqlPool, user: &User) -> Result<User> {
    sqlx::query("INSERT INTO users (Username, HashedPass) VALUES (?, ?)")
        .bind(&user.username)
        .bind(&user.hashed_password)
        .execute(pool)
        .await
        .context("Failed to create user")?;

    Ok(user.clone())
}

async fn get_user_by_username_mysql(pool: &MySqlPool, username: &str) -> Result<Option<User>> {
    let row = sqlx::query("SELECT Username, HashedPass FROM users WHERE Username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by username")?;

    Ok(row.map(|row| User {
        username: row.get("Username"),
        hashed_password: row.get("HashedPass"),
    }))
}

async fn count_by_username_mysql(pool: &MySqlPool, username: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE Username = ?")
        .bind(username)
        .fetch_one(pool)
        .await
        .context("Failed to count users")?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxUserRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxUserRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = setup_test_repo().await;

        repo.create(&User::new("alice", "hash-a"))
            .await
            .expect("Failed to create user");

        let found = repo
            .get_by_username("alice")
            .await
            .expect("Failed to get user")
            .expect("User not found");

        assert_eq!(found.username, "alice");
        assert_eq!(found.hashed_password, "hash-a");
    }

    #[tokio::test]
    async fn test_get_unknown_user_returns_none() {
        let repo = setup_test_repo().await;

        let found = repo.get_by_username("nobody").await.expect("Query failed");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_count_by_username() {
        let repo = setup_test_repo().await;
        assert_eq!(repo.count_by_username("alice").await.unwrap(), 0);

        repo.create(&User::new("alice", "hash")).await.unwrap();

        assert_eq!(repo.count_by_username("alice").await.unwrap(), 1);
        assert_eq!(repo.count_by_username("bob").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_insert_fails() {
        let repo = setup_test_repo().await;
        repo.create(&User::new("alice", "first")).await.unwrap();

        let result = repo.create(&User::new("alice", "second")).await;
        assert!(result.is_err());

        let stored = repo.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(stored.hashed_password, "first");
    }
}
