pub mod error;
pub mod generation;
pub mod health;
pub mod scripts;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the full API router. All routes are public and act as the demo
/// user.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health))
        // Scripts
        .route(
            "/api/scripts",
            get(scripts::list_scripts).post(scripts::create_script),
        )
        .route(
            "/api/scripts/:id",
            get(scripts::get_script)
                .patch(scripts::update_script)
                .delete(scripts::delete_script),
        )
        // Wizard stages
        .route("/api/scripts/:id/analyze", post(generation::analyze))
        .route("/api/scripts/:id/answers", post(generation::submit_answers))
        .route("/api/scripts/:id/generate", post(generation::generate))
        .route(
            "/api/scripts/:id/regenerate-structure",
            post(generation::regenerate_structure),
        )
        .route("/api/scripts/:id/ai-sessions", get(generation::list_ai_sessions))
}
