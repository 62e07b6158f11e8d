use crate::state::AppState;
use axum::Router;

pub mod auth;
pub mod crop;
pub mod customer;
pub mod dashboard;
pub mod field;
pub mod harvest;
pub mod input;
pub mod livestock;
pub mod product;
pub mod sale;
pub mod task;
pub mod utility;
pub mod view;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(utility::router())
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(view::router())
        .merge(field::router())
        .merge(crop::router())
        .merge(livestock::router())
        .merge(input::router())
        .merge(product::router())
        .merge(harvest::router())
        .merge(customer::router())
        .merge(task::router())
        .merge(sale::router())
}
