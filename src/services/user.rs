//! User service
//!
//! Implements account and session logic:
//! - Signup: validate, hash, reject taken usernames, store
//! - Login: verify credentials and open a server-side session
//! - Session validation for the access guard, with lazy expiry
//! - Periodic removal of expired sessions

use crate::db::repositories::{SessionRepository, UserRepository};
use crate::models::{Session, User};
use crate::services::password::{hash_password, verify_password};
use anyhow::Context;
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Default session lifetime in days
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 14;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Invalid credentials
    #[error("Authentication failed")]
    AuthenticationError,

    /// Invalid input
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Username already registered
    #[error("User already exists: {0}")]
    UserExists(String),

    /// No account with that username
    #[error("User not found: {0}")]
    NotFound(String),

    /// Store or hashing failure
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// User service for signup, login and session checks
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    session_ttl_days: i64,
}

impl UserService {
    /// Create a new user service with the default session lifetime
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
    ) -> Self {
        Self::with_session_ttl(user_repo, session_repo, DEFAULT_SESSION_TTL_DAYS)
    }

    /// Create a new user service with a custom session lifetime
    pub fn with_session_ttl(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        session_ttl_days: i64,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            session_ttl_days,
        }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if username or password is empty
    /// - `UserExists` if the username is taken
    /// - `Internal` for hashing or database errors
    pub async fn signup(&self, input: SignupInput) -> Result<(), UserServiceError> {
        if input.username.is_empty() || input.password.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Username and password are required".to_string(),
            ));
        }

        let existing = self
            .user_repo
            .count_by_username(&input.username)
            .await
            .context("Failed to check username")?;
        if existing > 0 {
            return Err(UserServiceError::UserExists(input.username));
        }

        let hashed_password = hash_password(&input.password).context("Failed to hash password")?;

        self.user_repo
            .create(&User::new(input.username, hashed_password))
            .await
            .context("Failed to create user")?;

        Ok(())
    }

    /// Verify credentials and open a session.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no user has that name
    /// - `AuthenticationError` if the password does not match
    /// - `Internal` for database errors or an unreadable stored hash
    pub async fn login(&self, input: LoginInput) -> Result<Session, UserServiceError> {
        let user = self
            .user_repo
            .get_by_username(&input.username)
            .await
            .context("Failed to get user by username")?
            .ok_or_else(|| UserServiceError::NotFound(input.username.clone()))?;

        let password_valid = verify_password(&input.password, &user.hashed_password)
            .context("Failed to verify password")?;
        if !password_valid {
            return Err(UserServiceError::AuthenticationError);
        }

        self.create_session(&user.username).await
    }

    /// Delete a session. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) -> Result<(), UserServiceError> {
        self.session_repo
            .delete(token)
            .await
            .context("Failed to delete session")?;
        Ok(())
    }

    /// Resolve a session token to its username.
    ///
    /// Returns `None` for unknown or expired sessions; expired ones are
    /// removed on the way.
    pub async fn validate_session(&self, token: &str) -> Result<Option<String>, UserServiceError> {
        let session = match self
            .session_repo
            .get_by_id(token)
            .await
            .context("Failed to get session")?
        {
            Some(s) => s,
            None => return Ok(None),
        };

        if session.is_expired() {
            if let Err(e) = self.session_repo.delete(token).await {
                tracing::warn!("Failed to delete expired session: {}", e);
            }
            return Ok(None);
        }

        Ok(Some(session.user_name))
    }

    /// Delete all expired sessions, returning how many were removed.
    pub async fn cleanup_expired_sessions(&self) -> Result<u64, UserServiceError> {
        let count = self
            .session_repo
            .delete_expired()
            .await
            .context("Failed to delete expired sessions")?;
        Ok(count)
    }

    async fn create_session(&self, user_name: &str) -> Result<Session, UserServiceError> {
        let now = Utc::now();
        let expires_at = Duration::try_days(self.session_ttl_days)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .with_context(|| {
                format!("Session lifetime out of range: {} days", self.session_ttl_days)
            })?;

        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_name: user_name.to_string(),
            expires_at,
            created_at: now,
        };

        let created = self
            .session_repo
            .create(&session)
            .await
            .context("Failed to create session")?;

        Ok(created)
    }
}

/// Input for signup
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub username: String,
    pub password: String,
}

impl SignupInput {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Input for login
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl LoginInput {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
