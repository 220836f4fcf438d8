//! Question service
//!
//! Business logic for questions, their posts and answers.

use anyhow::Context;
use std::sync::Arc;

use crate::db::repositories::{PostRepository, QuestionRepository};
use crate::models::{CreatePostInput, Post, Question, QuestionWithPosts};

/// Error types for question service operations
#[derive(Debug, thiserror::Error)]
pub enum QuestionServiceError {
    /// The referenced question does not exist
    #[error("question {0} not found")]
    NotFound(i64),

    /// Store failure
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Question service
pub struct QuestionService {
    questions: Arc<dyn QuestionRepository>,
    posts: Arc<dyn PostRepository>,
}

impl QuestionService {
    pub fn new(questions: Arc<dyn QuestionRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { questions, posts }
    }

    /// All questions in store order
    pub async fn list_questions(&self) -> Result<Vec<Question>, QuestionServiceError> {
        let questions = self
            .questions
            .list()
            .await
            .context("Failed to list questions")?;
        Ok(questions)
    }

    /// Store a new unanswered question and return every question
    pub async fn create_question(
        &self,
        content: &str,
    ) -> Result<Vec<Question>, QuestionServiceError> {
        let questions = self
            .questions
            .create_and_list(content)
            .await
            .context("Failed to create question")?;
        Ok(questions)
    }

    /// A question's content with all of its posts
    pub async fn get_question_with_posts(
        &self,
        question_id: i64,
    ) -> Result<QuestionWithPosts, QuestionServiceError> {
        let question = self
            .questions
            .get_by_id(question_id)
            .await
            .context("Failed to get question")?
            .ok_or(QuestionServiceError::NotFound(question_id))?;

        let posts = self
            .posts
            .list_by_question(question_id)
            .await
            .context("Failed to list posts")?;

        Ok(QuestionWithPosts {
            content: question.content,
            posts,
        })
    }

    /// Store a reply. The question it points at is not checked.
    pub async fn create_post(&self, input: CreatePostInput) -> Result<Post, QuestionServiceError> {
        let post = self
            .posts
            .create(&input)
            .await
            .context("Failed to create post")?;
        Ok(post)
    }

    /// Overwrite the answer of an existing question and return every question
    pub async fn answer_question(
        &self,
        question_id: i64,
        answer: &str,
    ) -> Result<Vec<Question>, QuestionServiceError> {
        self.questions
            .answer_and_list(question_id, answer)
            .await
            .context("Failed to answer question")?
            .ok_or(QuestionServiceError::NotFound(question_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxPostRepository, SqlxQuestionRepository};
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_service() -> QuestionService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        QuestionService::new(
            SqlxQuestionRepository::boxed(pool.clone()),
            SqlxPostRepository::boxed(pool),
        )
    }

    fn post(content: &str, question_id: i64) -> CreatePostInput {
        CreatePostInput {
            content: content.to_string(),
            question_id,
        }
    }

    #[tokio::test]
    async fn test_created_question_is_listed_unanswered() {
        let service = setup_test_service().await;

        let returned = service.create_question("What is a lifetime?").await.unwrap();
        let listed = service.list_questions().await.unwrap();

        assert_eq!(returned, listed);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].content, "What is a lifetime?");
        assert_eq!(listed[0].answer, "");
    }

    #[tokio::test]
    async fn test_question_with_posts() {
        let service = setup_test_service().await;
        let id = service.create_question("q").await.unwrap()[0].id;

        service.create_post(post("first", id)).await.unwrap();
        service.create_post(post("second", id)).await.unwrap();

        let detail = service.get_question_with_posts(id).await.unwrap();
        assert_eq!(detail.content, "q");
        let contents: Vec<_> = detail.posts.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_question_without_posts_has_empty_list() {
        let service = setup_test_service().await;
        let id = service.create_question("lonely").await.unwrap()[0].id;

        let detail = service.get_question_with_posts(id).await.unwrap();
        assert!(detail.posts.is_empty());
    }

    #[tokio::test]
    async fn test_missing_question_is_not_found() {
        let service = setup_test_service().await;

        let result = service.get_question_with_posts(77).await;
        assert!(matches!(result, Err(QuestionServiceError::NotFound(77))));
    }

    #[tokio::test]
    async fn test_post_to_unknown_question_is_stored() {
        let service = setup_test_service().await;

        let created = service.create_post(post("orphan", 404)).await.unwrap();
        assert_eq!(created.question_id, 404);
    }

    #[tokio::test]
    async fn test_answer_last_write_wins() {
        let service = setup_test_service().await;
        let id = service.create_question("q").await.unwrap()[0].id;

        service.answer_question(id, "one").await.unwrap();
        let questions = service.answer_question(id, "two").await.unwrap();

        assert_eq!(questions[0].answer, "two");
    }

    #[tokio::test]
    async fn test_answer_missing_question_leaves_list_unchanged() {
        let service = setup_test_service().await;
        let before = service.create_question("q").await.unwrap();

        let result = service.answer_question(before[0].id + 1, "a").await;
        assert!(matches!(result, Err(QuestionServiceError::NotFound(_))));

        assert_eq!(service.list_questions().await.unwrap(), before);
    }
}
