use crate::commands;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/ping", get(commands::utility::ping))
        .route("/api/utility/health", get(commands::utility::db_health))
}
