//! Question repository
//!
//! Database operations for questions. Writes that answer with the full
//! question list run the write and the re-read in one transaction, so the
//! returned list always contains the caller's own change.

use crate::config::DatabaseDriver;
use crate::db::{mysql_pool, sqlite_pool, DynDatabasePool};
use crate::models::Question;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

const SELECT_ALL: &str = "SELECT ID, Content, Answer FROM questions ORDER BY ID";
const SELECT_ONE: &str = "SELECT ID, Content, Answer FROM questions WHERE ID = ?";
const INSERT: &str = "INSERT INTO questions (Content, Answer) VALUES (?, '')";
const UPDATE_ANSWER: &str = "UPDATE questions SET Answer = ? WHERE ID = ?";

/// Question repository trait
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// List every question
    async fn list(&self) -> Result<Vec<Question>>;

    /// Get a question by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Question>>;

    /// Insert a question with an empty answer and return the updated list
    async fn create_and_list(&self, content: &str) -> Result<Vec<Question>>;

    /// Overwrite a question's answer and return the updated list.
    ///
    /// Returns `None` without writing anything if the question does not exist.
    async fn answer_and_list(&self, id: i64, answer: &str) -> Result<Option<Vec<Question>>>;
}

/// SQLx-based question repository implementation
pub struct SqlxQuestionRepository {
    pool: DynDatabasePool,
}

impl SqlxQuestionRepository {
    /// Create a new SQLx question repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn QuestionRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl QuestionRepository for SqlxQuestionRepository {
    async fn list(&self) -> Result<Vec<Question>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_sqlite(sqlite_pool(&self.pool)?).await,
            DatabaseDriver::Mysql => list_mysql(mysql_pool(&self.pool)?).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Question>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(sqlite_pool(&self.pool)?, id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(mysql_pool(&self.pool)?, id).await,
        }
    }

    async fn create_and_list(&self, content: &str) -> Result<Vec<Question>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_and_list_sqlite(sqlite_pool(&self.pool)?, content).await
            }
            DatabaseDriver::Mysql => create_and_list_mysql(mysql_pool(&self.pool)?, content).await,
        }
    }

    async fn answer_and_list(&self, id: i64, answer: &str) -> Result<Option<Vec<Question>>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                answer_and_list_sqlite(sqlite_pool(&self.pool)?, id, answer).await
            }
            DatabaseDriver::Mysql => {
                answer_and_list_mysql(mysql_pool(&self.pool)?, id, answer).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

fn row_to_question_sqlite(row: &sqlx::sqlite::SqliteRow) -> Question {
    Question {
        id: row.get("ID"),
        content: row.get("Content"),
        answer: row.get("Answer"),
    }
}

async fn list_sqlite(pool: &SqlitePool) -> Result<Vec<Question>> {
    let rows = sqlx::query(SELECT_ALL)
        .fetch_all(pool)
        .await
        .context("Failed to list questions")?;

    Ok(rows.iter().map(row_to_question_sqlite).collect())
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Question>> {
    let row = sqlx::query(SELECT_ONE)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get question by ID")?;

    Ok(row.as_ref().map(row_to_question_sqlite))
}

async fn create_and_list_sqlite(pool: &SqlitePool, content: &str) -> Result<Vec<Question>> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    sqlx::query(INSERT)
        .bind(content)
        .execute(&mut *tx)
        .await
        .context("Failed to create question")?;

    let rows = sqlx::query(SELECT_ALL)
        .fetch_all(&mut *tx)
        .await
        .context("Failed to list questions")?;

    tx.commit().await.context("Failed to commit transaction")?;

    Ok(rows.iter().map(row_to_question_sqlite).collect())
}

async fn answer_and_list_sqlite(
    pool: &SqlitePool,
    id: i64,
    answer: &str,
) -> Result<Option<Vec<Question>>> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    // Write first so the write lock is held from the first statement.
    // SQLite counts matched rows: zero means no such question.
    let updated = sqlx::query(UPDATE_ANSWER)
        .bind(answer)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to update answer")?;
    if updated.rows_affected() == 0 {
        tx.rollback().await.context("Failed to roll back transaction")?;
        return Ok(None);
    }

    let rows = sqlx::query(SELECT_ALL)
        .fetch_all(&mut *tx)
        .await
        .context("Failed to list questions")?;

    tx.commit().await.context("Failed to commit transaction")?;

    Ok(Some(rows.iter().map(row_to_question_sqlite).collect()))
}

// ============================================================================
// MySQL implementations
// ============================================================================

fn row_to_question_mysql(row: &sqlx::mysql::MySqlRow) -> Question {
    Question {
        id: row.get("ID"),
        content: row.get("Content"),
        answer: row.get("Answer"),
    }
}

async fn list_mysql(pool: &MySqlPool) -> Result<Vec<Question>> {
    let rows = sqlx::query(SELECT_ALL)
        .fetch_all(pool)
        .await
        .context("Failed to list questions")?;

    Ok(rows.iter().map(row_to_question_mysql).collect())
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Question>> {
    let row = sqlx::query(SELECT_ONE)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get question by ID")?;

    Ok(row.as_ref().map(row_to_question_mysql))
}

async fn create_and_list_mysql(pool: &MySqlPool, content: &str) -> Result<Vec<Question>> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    sqlx::query(INSERT)
        .bind(content)
        .execute(&mut *tx)
        .await
        .context("Failed to create question")?;

    let rows = sqlx::query(SELECT_ALL)
        .fetch_all(&mut *tx)
        .await
        .context("Failed to list questions")?;

    tx.commit().await.context("Failed to commit transaction")?;

    Ok(rows.iter().map(row_to_question_mysql).collect())
}

async fn answer_and_list_mysql(
    pool: &MySqlPool,
    id: i64,
    answer: &str,
) -> Result<Option<Vec<Question>>> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    // Lock the row so concurrent answers serialize on it.
    let existing = sqlx::query("SELECT ID FROM questions WHERE ID = ? FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to get question by ID")?;
    if existing.is_none() {
        tx.rollback().await.context("Failed to roll back transaction")?;
        return Ok(None);
    }

    sqlx::query(UPDATE_ANSWER)
        .bind(answer)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to update answer")?;

    let rows = sqlx::query(SELECT_ALL)
        .fetch_all(&mut *tx)
        .await
        .context("Failed to list questions")?;

    tx.commit().await.context("Failed to commit transaction")?;

    Ok(Some(rows.iter().map(row_to_question_mysql).collect()))
}
