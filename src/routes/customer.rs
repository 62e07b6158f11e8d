use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/customer/list", get(commands::customer::list_customers))
        .route("/api/customer/create", post(commands::customer::create_customer))
        .route("/api/customer/update", post(commands::customer::update_customer))
        .route("/api/customer/delete", post(commands::customer::delete_customer))
}
