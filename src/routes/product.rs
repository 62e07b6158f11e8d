use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/product/list", get(commands::product::list_products))
        .route("/api/product/create", post(commands::product::create_product))
        .route("/api/product/update", post(commands::product::update_product))
        .route("/api/product/delete", post(commands::product::delete_product))
}
