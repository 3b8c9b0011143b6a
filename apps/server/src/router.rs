use crate::handlers::{admin, capture, drops, health};
use crate::state::AppState;
use axum::Router;
use axum::routing::{delete, get, patch, post};
use tower_http::trace::TraceLayer;

/// Builds the HTTP surface over a fully wired [`AppState`].
pub fn init(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/capture",
            post(capture::capture_handler).fallback(capture::method_not_allowed),
        )
        .route("/api/drops", get(drops::list_drops).post(admin::schedule_drop))
        .route("/api/drops/random", post(admin::generate_drops))
        .route("/api/drops/missed", delete(admin::purge_missed))
        .route("/api/drops/{id}", patch(admin::reschedule_drop))
        .route("/api/competitors/{id}", patch(admin::set_delay))
        .route("/api/sweep", post(drops::sweep_now))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
