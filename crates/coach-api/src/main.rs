//! HTTP API for the AI accountability coach.
//!
//! Serves the chat, history, profile and preferences endpoints used by the
//! web client.

mod config;
mod error;
mod extract;
mod routes;
mod state;

use std::sync::Arc;

use coach_brain::OpenRouterBrain;
use database::Database;
use orchestrator::{Orchestrator, OrchestratorConfig};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting coach API server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;
    info!(url = %config.database_url, "Database ready");

    // Completion gateway
    let brain = Arc::new(OpenRouterBrain::from_env()?);

    // Build application state
    let orchestrator = Orchestrator::new(db, brain, OrchestratorConfig::from_env());
    let state = AppState::new(orchestrator);

    // Build router
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Coach API server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
