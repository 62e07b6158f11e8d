use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/input/list", get(commands::input::list_inputs))
        .route("/api/input/create", post(commands::input::create_input))
        .route("/api/input/update", post(commands::input::update_input))
        .route("/api/input/delete", post(commands::input::delete_input))
}
