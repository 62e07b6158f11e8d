use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/crop/list", get(commands::crop::list_crops))
        .route("/api/crop/create", post(commands::crop::create_crop))
        .route("/api/crop/update", post(commands::crop::update_crop))
        .route("/api/crop/delete", post(commands::crop::delete_crop))
}
