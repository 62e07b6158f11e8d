use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/sale/list", get(commands::sale::list_sales))
        .route("/api/sale/create", post(commands::sale::create_sale))
        .route("/api/sale/update", post(commands::sale::update_sale))
        .route("/api/sale/delete", post(commands::sale::delete_sale))
        .route("/api/marketplace/order", post(commands::sale::place_order))
}
