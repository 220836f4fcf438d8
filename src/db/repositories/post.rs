//! Post repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

use crate::config::DatabaseDriver;
use crate::db::{mysql_pool, sqlite_pool, DynDatabasePool};
use crate::models::{CreatePostInput, Post};

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post. The referenced question is not checked.
    async fn create(&self, input: &CreatePostInput) -> Result<Post>;

    /// List the posts replying to a question
    async fn list_by_question(&self, question_id: i64) -> Result<Vec<Post>>;
}

/// SQLx-based post repository implementation
pub struct SqlxPostRepository {
    pool: DynDatabasePool,
}

impl SqlxPostRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, input: &CreatePostInput) -> Result<Post> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(sqlite_pool(&self.pool)?, input).await,
            DatabaseDriver::Mysql => create_mysql(mysql_pool(&self.pool)?, input).await,
        }
    }

    async fn list_by_question(&self, question_id: i64) -> Result<Vec<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_by_question_sqlite(sqlite_pool(&self.pool)?, question_id).await
            }
            DatabaseDriver::Mysql => {
                list_by_question_mysql(mysql_pool(&self.pool)?, question_id).await
            }
        }
    }
}

// SQLite implementations
async fn create_sqlite(pool: &SqlitePool, input: &CreatePostInput) -> Result<Post> {
    let result = sqlx::query("INSERT INTO posts (Content, QuestionID) VALUES (?, ?)")
        .bind(&input.content)
        .bind(input.question_id)
        .execute(pool)
        .await
        .context("Failed to create post")?;

    Ok(Post {
        id: result.last_insert_rowid(),
        content: input.content.clone(),
        question_id: input.question_id,
    })
}

async fn list_by_question_sqlite(pool: &SqlitePool, question_id: i64) -> Result<Vec<Post>> {
    let rows = sqlx::query(
        "SELECT ID, Content, QuestionID FROM posts WHERE QuestionID = ? ORDER BY ID",
    )
    .bind(question_id)
    .fetch_all(pool)
    .await
    .context("Failed to list posts")?;

    Ok(rows
        .iter()
        .map(|r| Post {
            id: r.get("ID"),
            content: r.get("Content"),
            question_id: r.get("QuestionID"),
        })
        .collect())
}

// MySQL implementations
async fn create_mysql(pool: &MySqlPool, input: &CreatePostInput) -> Result<Post> {
    let result = sqlx::query("INSERT INTO posts (Content, QuestionID) VALUES (?, ?)")
        .bind(&input.content)
        .bind(input.question_id)
        .execute(pool)
        .await
        .context("Failed to create post")?;

    let id = i64::try_from(result.last_insert_id()).context("Post ID out of range")?;

    Ok(Post {
        id,
        content: input.content.clone(),
        question_id: input.question_id,
    })
}

async fn list_by_question_mysql(pool: &MySqlPool, question_id: i64) -> Result<Vec<Post>> {
    let rows = sqlx::query(
        "SELECT ID, Content, QuestionID FROM posts WHERE QuestionID = ? ORDER BY ID",
    )
    .bind(question_id)
    .fetch_all(pool)
    .await
    .context("Failed to list posts")?;

    Ok(rows
        .iter()
        .map(|r| Post {
            id: r.get("ID"),
            content: r.get("Content"),
            question_id: r.get("QuestionID"),
        })
        .collect())
}
