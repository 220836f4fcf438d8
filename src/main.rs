//! qaboard - A small question and answer board

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qaboard::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{
            SqlxPostRepository, SqlxQuestionRepository, SqlxSessionRepository, SqlxUserRepository,
        },
    },
    services::{QuestionService, UserService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qaboard=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting qaboard...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    pool.ping().await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    // Run migrations
    let pending = db::migrations::pending_count(&pool).await?;
    if pending > 0 {
        tracing::info!("Applying {} pending migrations", pending);
    }
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repositories
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let session_repo = SqlxSessionRepository::boxed(pool.clone());
    let question_repo = SqlxQuestionRepository::boxed(pool.clone());
    let post_repo = SqlxPostRepository::boxed(pool.clone());

    // Initialize services
    let user_service = Arc::new(UserService::with_session_ttl(
        user_repo,
        session_repo,
        config.session.ttl_days,
    ));
    let question_service = Arc::new(QuestionService::new(question_repo, post_repo));

    // Start expired session sweep
    {
        let service = user_service.clone();
        let period = tokio::time::Duration::from_secs(config.session.cleanup_interval_secs.max(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                match service.cleanup_expired_sessions().await {
                    Ok(0) => {}
                    Ok(n) => tracing::info!("Removed {} expired sessions", n),
                    Err(e) => tracing::warn!("Session cleanup failed: {}", e),
                }
            }
        });
    }

    let state = AppState {
        user_service,
        question_service,
        session: Arc::new(config.session.clone()),
    };

    // Build router
    let app = api::build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
