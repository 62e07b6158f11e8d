use axum::{extract::State, Json};

use crate::error::AgriResult;
use crate::state::AppState;

pub async fn ping() -> &'static str {
    "pong"
}

pub async fn db_health(State(state): State<AppState>) -> AgriResult<Json<bool>> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;
    Ok(Json(true))
}
