use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/livestock/list", get(commands::livestock::list_livestock))
        .route("/api/livestock/create", post(commands::livestock::create_livestock))
        .route("/api/livestock/update", post(commands::livestock::update_livestock))
        .route("/api/livestock/delete", post(commands::livestock::delete_livestock))
}
