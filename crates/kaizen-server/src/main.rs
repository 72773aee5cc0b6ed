use anyhow::Context;
use axum::{extract::FromRef, middleware, routing::get, Json, Router};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod adapters;
mod application;
mod auth;
mod models;
mod routes;
mod services;

use adapters::{PgDailyQuestsRepository, PgHistoryRepository, PgPlayerRepository};
use application::{PlayerService, QuestService, SessionManager};
use services::{AnthropicGenerator, LogNotifier, SyncWriter};

/// Type aliases for application services with the concrete generator
pub type AppPlayerService = PlayerService<AnthropicGenerator>;
pub type AppQuestService = QuestService<AnthropicGenerator>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub player_service: Arc<AppPlayerService>,
    pub quest_service: Arc<AppQuestService>,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> PgPool {
        state.pool.clone()
    }
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kaizen_server=debug,tower_http=debug,info".into()),
        )
        .init();

    tracing::info!("Kaizen API initializing...");

    match std::env::var("KAIZEN_API_KEY") {
        Ok(api_key) => {
            auth::init_api_key(api_key);
            tracing::info!("API key authentication enabled");
        }
        Err(_) => tracing::warn!("No KAIZEN_API_KEY set - authentication disabled"),
    }

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to database")?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("failed to run database migrations")?;
    tracing::info!("Database migrations completed");

    let anthropic_key =
        std::env::var("ANTHROPIC_API_KEY").context("ANTHROPIC_API_KEY is not set")?;
    let generator = Arc::new(AnthropicGenerator::new(anthropic_key));

    let sessions = Arc::new(SessionManager::new(
        Arc::new(PgPlayerRepository::new(pool.clone())),
        Arc::new(PgDailyQuestsRepository::new(pool.clone())),
        Arc::new(PgHistoryRepository::new(pool.clone())),
    ));
    let sync = SyncWriter::spawn(Arc::clone(&sessions));
    let notifier = Arc::new(LogNotifier);

    let player_service = Arc::new(PlayerService::new(
        Arc::clone(&sessions),
        Arc::clone(&generator),
        sync.clone(),
    ));
    let quest_service = Arc::new(QuestService::new(
        sessions,
        generator,
        notifier,
        sync,
    ));

    let state = AppState {
        pool,
        player_service,
        quest_service,
    };

    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .merge(routes::players::router())
        .merge(routes::goals::router())
        .merge(routes::quests::router())
        .merge(routes::history::router())
        .layer(middleware::from_fn(auth::auth_middleware));

    let router = Router::new()
        .route("/health", get(health_check))
        .merge(routes::docs::router())
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = std::env::var("KAIZEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Kaizen API listening on {}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}
