use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/logs", get(handlers::list_logs).post(handlers::create_log))
        .route(
            "/api/logs/:id",
            axum::routing::patch(handlers::update_log).delete(handlers::delete_log),
        )
        .with_state(state)
}
