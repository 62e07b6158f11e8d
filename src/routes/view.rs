use crate::commands;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/nav", get(commands::view::get_nav))
        .route("/api/view/:id", get(commands::view::resolve_view))
}
