use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/field/list", get(commands::field::list_fields))
        .route("/api/field/create", post(commands::field::create_field))
        .route("/api/field/update", post(commands::field::update_field))
        .route("/api/field/delete", post(commands::field::delete_field))
}
