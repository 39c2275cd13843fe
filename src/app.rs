use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/update", post(handlers::update_form))
        .route("/api/state", get(handlers::get_state))
        .route("/api/update", post(handlers::update))
        .route("/api/reset/today", post(handlers::reset_today))
        .route("/api/reset/week", post(handlers::reset_week))
        .route(
            "/api/settings/toggle-week-start",
            post(handlers::toggle_week_start),
        )
        .route("/export/week.csv", get(handlers::export_week))
        .route("/export/all.csv", get(handlers::export_all))
        .with_state(state)
}
