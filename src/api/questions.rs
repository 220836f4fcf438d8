//! Question API endpoints
//!
//! - GET /ping - Liveness check
//! - GET /questions - All questions
//! - GET /question, GET /posts - One question with its posts
//! - POST /send_question - Ask a question
//! - POST /send_post - Reply to a question
//! - POST /answer - Answer a question (session required)

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::{CreatePostInput, Question, QuestionWithPosts};

/// `?id=` query selecting a question
#[derive(Debug, Default, Deserialize)]
pub struct QuestionIdQuery {
    pub id: Option<String>,
}

impl QuestionIdQuery {
    /// Numeric id, if present and well formed
    fn question_id(&self) -> Option<i64> {
        self.id.as_deref().and_then(|id| id.trim().parse().ok())
    }
}

/// Form body for asking a question
#[derive(Debug, Deserialize)]
pub struct QuestionForm {
    pub content: String,
}

/// Form body for answering a question
#[derive(Debug, Deserialize)]
pub struct AnswerForm {
    pub answer: String,
}

/// Build public question routes
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/questions", get(list_questions))
        .route("/question", get(get_question))
        .route("/posts", get(get_question))
        .route("/send_question", post(send_question))
        .route("/send_post", post(send_post))
}

/// Build protected question routes (requires the session guard)
pub fn protected_router() -> Router<AppState> {
    Router::new().route("/answer", post(answer))
}

/// GET /ping
async fn ping() -> &'static str {
    "pong"
}

/// GET /questions
async fn list_questions(State(state): State<AppState>) -> Result<Json<Vec<Question>>, ApiError> {
    let questions = state.question_service.list_questions().await?;
    Ok(Json(questions))
}

/// GET /question?id=N and GET /posts?id=N
///
/// A missing or malformed id resolves to no question.
async fn get_question(
    State(state): State<AppState>,
    query: Result<Query<QuestionIdQuery>, QueryRejection>,
) -> Result<Json<QuestionWithPosts>, ApiError> {
    let id = query
        .ok()
        .and_then(|Query(q)| q.question_id())
        .ok_or_else(|| ApiError::db_error("no question with that id"))?;

    let detail = state.question_service.get_question_with_posts(id).await?;
    Ok(Json(detail))
}

/// POST /send_question
async fn send_question(
    State(state): State<AppState>,
    form: Result<Form<QuestionForm>, FormRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Form(body) = form.map_err(|e| {
        tracing::debug!("Rejected question form: {}", e);
        ApiError::bad_request()
    })?;

    let questions = state.question_service.create_question(&body.content).await?;
    Ok((StatusCode::CREATED, Json(questions)))
}

/// POST /send_post
async fn send_post(
    State(state): State<AppState>,
    form: Result<Form<CreatePostInput>, FormRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Form(input) = form.map_err(|e| {
        tracing::debug!("Rejected post form: {}", e);
        ApiError::bad_request()
    })?;

    state.question_service.create_post(input).await?;
    Ok(StatusCode::CREATED)
}

/// POST /answer?id=N
async fn answer(
    State(state): State<AppState>,
    query: Result<Query<QuestionIdQuery>, QueryRejection>,
    form: Result<Form<AnswerForm>, FormRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Form(body) = form.map_err(|e| {
        tracing::debug!("Rejected answer form: {}", e);
        ApiError::bad_request()
    })?;

    let id = query
        .ok()
        .and_then(|Query(q)| q.question_id())
        .ok_or_else(|| ApiError::db_error("no question with that id"))?;

    let questions = state
        .question_service
        .answer_question(id, &body.answer)
        .await?;
    Ok((StatusCode::CREATED, Json(questions)))
}
