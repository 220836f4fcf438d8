//! API middleware
//!
//! Contains:
//! - Shared application state
//! - Plain-text error responses
//! - Session guard for protected routes

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::config::SessionConfig;
use crate::services::{QuestionService, QuestionServiceError, UserService, UserServiceError};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub question_service: Arc<QuestionService>,
    pub session: Arc<SessionConfig>,
}

/// Identity attached by [`require_session`]
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub username: String,
}

/// Error response rendered as a plain-text body
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Request body or query could not be bound
    pub fn bad_request() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "400 Bad Request")
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn db_error(error: impl std::fmt::Display) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("db error: {}", error),
        )
    }

    pub fn session_error() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "something wrong in getting session",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "{}", self.message);
        }

        if self.message.is_empty() {
            self.status.into_response()
        } else {
            (self.status, self.message).into_response()
        }
    }
}

impl From<UserServiceError> for ApiError {
    fn from(e: UserServiceError) -> Self {
        match e {
            UserServiceError::ValidationError(_) => ApiError::validation_error("empty field"),
            UserServiceError::UserExists(_) => ApiError::conflict("user already exists"),
            UserServiceError::AuthenticationError => ApiError::forbidden(""),
            UserServiceError::NotFound(msg) => ApiError::db_error(msg),
            UserServiceError::Internal(e) => ApiError::db_error(format!("{:#}", e)),
        }
    }
}

impl From<QuestionServiceError> for ApiError {
    fn from(e: QuestionServiceError) -> Self {
        ApiError::db_error(e)
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::forbidden("please login"))
    }
}

/// Extract the session token from the named cookie
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let prefix = format!("{}=", cookie_name);

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))
        .filter(|token| !token.is_empty())
        .map(String::from)
}

/// Session guard
///
/// Rejects requests without a live session with 403 `please login`.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(request.headers(), &state.session.cookie_name)
        .ok_or_else(|| ApiError::forbidden("please login"))?;

    let username = state
        .user_service
        .validate_session(&token)
        .await
        .map_err(|e| {
            tracing::warn!("Session lookup failed: {}", e);
            ApiError::session_error()
        })?
        .ok_or_else(|| ApiError::forbidden("please login"))?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { username });
    Ok(next.run(request).await)
}
