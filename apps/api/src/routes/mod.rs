pub mod candidates;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::scoring::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Unknown paths get the single-page app's entry document.
    let static_dir = state.config.static_dir.clone();
    let spa = ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/candidates", get(candidates::handle_list_candidates))
        // Scoring API
        .route("/api/scores", get(handlers::handle_get_scores))
        .route("/api/scores/run", post(handlers::handle_run_scoring))
        .route("/api/scores/reset", post(handlers::handle_reset_scores))
        .route("/api/scores/:id", get(handlers::handle_get_score))
        .fallback_service(spa)
        .with_state(state)
}
