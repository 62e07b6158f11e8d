use axum::{extract::State, Extension, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::commands::{require_id, IdPayload};
use crate::db::{DbPool, Field};
use crate::error::{AgriError, AgriResult};
use crate::middleware::auth::Claims;
use crate::permissions::{require_modify, ViewId};
use crate::state::AppState;
use crate::validation;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldForm {
    pub id: Option<Uuid>,
    pub name: String,
    pub size: Decimal,
    pub location: String,
    pub soil_type: String,
    pub irrigation_system: Option<String>,
    pub status: Option<String>,
}

pub(crate) async fn fetch_fields(pool: &DbPool) -> AgriResult<Vec<Field>> {
    Ok(
        sqlx::query_as::<_, Field>("SELECT * FROM fields ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?,
    )
}

pub async fn list_fields(State(state): State<AppState>) -> AgriResult<Json<Vec<Field>>> {
    Ok(Json(fetch_fields(&state.pool).await?))
}

pub async fn create_field(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<FieldForm>,
) -> AgriResult<Json<Field>> {
    require_modify(&claims, ViewId::Fields)?;
    validation::validate_field(&form).into_result()?;

    let row = sqlx::query_as::<_, Field>(
        "INSERT INTO fields (name, size, location, soil_type, irrigation_system, status) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(&form.name)
    .bind(form.size)
    .bind(&form.location)
    .bind(&form.soil_type)
    .bind(&form.irrigation_system)
    .bind(form.status.as_deref().unwrap_or("active"))
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(row))
}

pub async fn update_field(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<FieldForm>,
) -> AgriResult<Json<Field>> {
    require_modify(&claims, ViewId::Fields)?;
    validation::validate_field(&form).into_result()?;
    let id = require_id(form.id)?;

    let row = sqlx::query_as::<_, Field>(
        "UPDATE fields SET name = $1, size = $2, location = $3, soil_type = $4, \
         irrigation_system = $5, status = $6, updated_at = now() WHERE id = $7 RETURNING *",
    )
    .bind(&form.name)
    .bind(form.size)
    .bind(&form.location)
    .bind(&form.soil_type)
    .bind(&form.irrigation_system)
    .bind(form.status.as_deref().unwrap_or("active"))
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AgriError::NotFound("Field not found".into()))?;

    Ok(Json(row))
}

pub async fn delete_field(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<IdPayload>,
) -> AgriResult<Json<()>> {
    require_modify(&claims, ViewId::Fields)?;

    let result = sqlx::query("DELETE FROM fields WHERE id = $1")
        .bind(payload.id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AgriError::NotFound("Field not found".into()));
    }

    Ok(Json(()))
}
