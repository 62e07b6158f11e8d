use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/task/list", get(commands::task::list_tasks))
        .route("/api/task/create", post(commands::task::create_task))
        .route("/api/task/update", post(commands::task::update_task))
        .route("/api/task/delete", post(commands::task::delete_task))
}
