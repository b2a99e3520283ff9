use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/readings", post(handlers::submit_reading_form))
        .route(
            "/api/readings",
            get(handlers::list_readings).post(handlers::create_reading),
        )
        .route("/api/series", get(handlers::get_series))
        .route("/api/classify", get(handlers::classify_value))
        .route(
            "/api/premium",
            get(handlers::get_premium).post(handlers::set_premium),
        )
        .with_state(state)
}
