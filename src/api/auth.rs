//! Authentication API endpoints
//!
//! - POST /signup - Create an account
//! - POST /login - Open a session and set the session cookie
//! - GET /whoami - Name bound to the current session

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::config::SessionConfig;
use crate::services::user::{LoginInput, SignupInput};

/// Form body shared by signup and login
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

/// Response for the whoami endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub username: String,
}

/// Build public auth routes (no session required)
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Build protected auth routes (requires the session guard)
pub fn protected_router() -> Router<AppState> {
    Router::new().route("/whoami", get(whoami))
}

/// POST /signup
///
/// An unreadable body counts as empty fields.
async fn signup(
    State(state): State<AppState>,
    form: Result<Form<CredentialsForm>, FormRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body = form.map(|Form(body)| body).unwrap_or_default();

    state
        .user_service
        .signup(SignupInput::new(body.username.clone(), body.password))
        .await?;

    tracing::info!(username = %body.username, "User signed up");
    Ok(StatusCode::CREATED)
}

/// POST /login
async fn login(
    State(state): State<AppState>,
    form: Result<Form<CredentialsForm>, FormRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body = form.map(|Form(body)| body).unwrap_or_default();

    let session = state
        .user_service
        .login(LoginInput::new(body.username, body.password))
        .await?;

    tracing::info!(username = %session.user_name, "User logged in");

    let cookie = session_cookie(&state.session, &session.id);
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)]))
}

/// GET /whoami
async fn whoami(user: AuthenticatedUser) -> Json<MeResponse> {
    Json(MeResponse {
        username: user.username,
    })
}

/// `Set-Cookie` value carrying a session token
fn session_cookie(config: &SessionConfig, token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.cookie_name,
        token,
        config.max_age_secs()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie(&SessionConfig::default(), "tok");
        assert_eq!(
            cookie,
            "sessions=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=1209600"
        );
    }
}
