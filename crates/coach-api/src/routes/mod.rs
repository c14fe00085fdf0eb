//! Route handlers for the coach API.

pub mod chat;
pub mod health;
pub mod history;
pub mod preferences;
pub mod profile;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Conversation
        .route("/chat", post(chat::chat))
        .route("/router", post(chat::quick_reply))
        .route(
            "/history",
            get(history::get_history).delete(history::clear_history),
        )
        // Profile
        .route(
            "/profile",
            get(profile::get_profile).post(profile::save_profile),
        )
        .route(
            "/preferences",
            get(preferences::get_preferences).post(preferences::save_preferences),
        )
}
