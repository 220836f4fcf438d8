//! API layer - HTTP handlers and routing
//!
//! - Question and post endpoints
//! - Signup/login and whoami endpoints
//! - Session guard and error rendering

pub mod auth;
pub mod middleware;
pub mod questions;

use axum::{middleware as axum_middleware, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub use middleware::{ApiError, AppState, AuthenticatedUser};

/// Build the API routes
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Protected routes (need a live session)
    let protected_routes = Router::new()
        .merge(auth::protected_router())
        .merge(questions::protected_router())
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_session,
        ));

    // Public routes
    Router::new()
        .merge(questions::public_router())
        .merge(auth::public_router())
        .merge(protected_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState) -> Router {
    build_api_router(state.clone())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
