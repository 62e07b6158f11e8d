use axum::{extract::State, Extension, Json};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::commands::{require_id, IdPayload};
use crate::db::{DbPool, FarmInput};
use crate::error::{AgriError, AgriResult};
use crate::middleware::auth::Claims;
use crate::permissions::{require_modify, ViewId};
use crate::state::AppState;
use crate::validation;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputForm {
    pub id: Option<Uuid>,
    pub name: String,
    pub input_type: String,
    pub supplier: String,
    pub quantity_in_stock: Decimal,
    pub unit: String,
    pub cost_per_unit: Decimal,
    pub reorder_level: Decimal,
    pub expiry_date: Option<NaiveDate>,
}

pub(crate) async fn fetch_inputs(pool: &DbPool) -> AgriResult<Vec<FarmInput>> {
    Ok(
        sqlx::query_as::<_, FarmInput>("SELECT * FROM inputs ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?,
    )
}

pub async fn list_inputs(State(state): State<AppState>) -> AgriResult<Json<Vec<FarmInput>>> {
    Ok(Json(fetch_inputs(&state.pool).await?))
}

pub async fn create_input(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<InputForm>,
) -> AgriResult<Json<FarmInput>> {
    require_modify(&claims, ViewId::Inputs)?;
    validation::validate_input(&form).into_result()?;

    let row = sqlx::query_as::<_, FarmInput>(
        "INSERT INTO inputs (name, input_type, supplier, quantity_in_stock, unit, cost_per_unit, \
         reorder_level, expiry_date) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(&form.name)
    .bind(&form.input_type)
    .bind(&form.supplier)
    .bind(form.quantity_in_stock)
    .bind(&form.unit)
    .bind(form.cost_per_unit)
    .bind(form.reorder_level)
    .bind(form.expiry_date)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(row))
}

pub async fn update_input(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<InputForm>,
) -> AgriResult<Json<FarmInput>> {
    require_modify(&claims, ViewId::Inputs)?;
    validation::validate_input(&form).into_result()?;
    let id = require_id(form.id)?;

    let row = sqlx::query_as::<_, FarmInput>(
        "UPDATE inputs SET name = $1, input_type = $2, supplier = $3, quantity_in_stock = $4, \
         unit = $5, cost_per_unit = $6, reorder_level = $7, expiry_date = $8, updated_at = now() \
         WHERE id = $9 RETURNING *",
    )
    .bind(&form.name)
    .bind(&form.input_type)
    .bind(&form.supplier)
    .bind(form.quantity_in_stock)
    .bind(&form.unit)
    .bind(form.cost_per_unit)
    .bind(form.reorder_level)
    .bind(form.expiry_date)
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AgriError::NotFound("Input not found".into()))?;

    Ok(Json(row))
}

pub async fn delete_input(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<IdPayload>,
) -> AgriResult<Json<()>> {
    require_modify(&claims, ViewId::Inputs)?;

    let result = sqlx::query("DELETE FROM inputs WHERE id = $1")
        .bind(payload.id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AgriError::NotFound("Input not found".into()));
    }

    Ok(Json(()))
}
