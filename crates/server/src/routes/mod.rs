use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod health;
mod reports;
mod rooms;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Room lifecycle
        .route("/api/rooms", post(rooms::create_room))
        .route("/api/rooms/:code", get(rooms::get_room))
        .route("/api/rooms/:code/join", post(rooms::join_room))
        .route("/api/rooms/:code/tickets", post(rooms::upload_tickets))
        .route("/api/rooms/:code/reorder", post(rooms::reorder_tickets))
        .route("/api/rooms/:code/start", post(rooms::start_planning))
        .route("/api/rooms/:code/next", post(rooms::next_ticket))
        .route("/api/rooms/:code/prev", post(rooms::prev_ticket))
        .route("/api/rooms/:code/pause", post(rooms::pause_session))
        .route("/api/rooms/:code/resume", post(rooms::resume_session))
        .route("/api/rooms/:code/end", post(rooms::end_session))
        // Voting round
        .route("/api/rooms/:code/vote", post(rooms::vote))
        .route("/api/rooms/:code/reveal", post(rooms::reveal))
        .route("/api/rooms/:code/reset", post(rooms::reset_votes))
        .route("/api/rooms/:code/agree", post(rooms::set_agreed_points))
        .route("/api/rooms/:code/summary", get(rooms::session_summary))
        // Reports
        .route(
            "/api/reports",
            get(reports::list_reports).post(reports::save_report),
        )
        .route(
            "/api/reports/:id",
            get(reports::get_report).delete(reports::delete_report),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
