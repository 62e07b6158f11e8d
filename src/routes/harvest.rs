use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/harvest/list", get(commands::harvest::list_harvests))
        .route("/api/harvest/create", post(commands::harvest::create_harvest))
        .route("/api/harvest/update", post(commands::harvest::update_harvest))
        .route("/api/harvest/delete", post(commands::harvest::delete_harvest))
}
