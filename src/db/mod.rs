//! Database layer
//!
//! Persistence gateway for the Q&A board. Supports:
//! - SQLite (default, single-file deployment)
//! - MySQL
//!
//! The driver is selected from configuration; repositories receive the pool
//! as a [`DynDatabasePool`] and dispatch on [`DatabasePool::driver`].
//!
//! ```ignore
//! use qaboard::config::DatabaseConfig;
//! use qaboard::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, mysql_pool, sqlite_pool, DatabasePool, DynDatabasePool,
    MysqlDatabase, SqliteDatabase,
};
