use axum::{extract::State, Extension, Json};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::commands::{require_id, IdPayload};
use crate::db::{Crop, DbPool};
use crate::error::{AgriError, AgriResult};
use crate::middleware::auth::Claims;
use crate::permissions::{require_modify, ViewId};
use crate::state::AppState;
use crate::validation;

const CROP_SELECT: &str =
    "SELECT c.*, f.name AS field_name FROM crops c LEFT JOIN fields f ON f.id = c.field_id";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CropForm {
    pub id: Option<Uuid>,
    pub name: String,
    pub variety: String,
    pub planting_date: Option<NaiveDate>,
    pub expected_harvest_date: Option<NaiveDate>,
    pub field_id: Option<Uuid>,
    pub status: Option<String>,
    pub area: Decimal,
    pub notes: Option<String>,
}

pub(crate) async fn fetch_crops(pool: &DbPool) -> AgriResult<Vec<Crop>> {
    Ok(
        sqlx::query_as::<_, Crop>(&format!("{} ORDER BY c.created_at DESC", CROP_SELECT))
            .fetch_all(pool)
            .await?,
    )
}

async fn fetch_crop(pool: &DbPool, id: Uuid) -> AgriResult<Crop> {
    sqlx::query_as::<_, Crop>(&format!("{} WHERE c.id = $1", CROP_SELECT))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AgriError::NotFound("Crop not found".into()))
}

pub async fn list_crops(State(state): State<AppState>) -> AgriResult<Json<Vec<Crop>>> {
    Ok(Json(fetch_crops(&state.pool).await?))
}

pub async fn create_crop(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<CropForm>,
) -> AgriResult<Json<Crop>> {
    require_modify(&claims, ViewId::Crops)?;
    validation::validate_crop(&form).into_result()?;

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO crops (name, variety, planting_date, expected_harvest_date, field_id, status, area, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
    )
    .bind(&form.name)
    .bind(&form.variety)
    .bind(form.planting_date)
    .bind(form.expected_harvest_date)
    .bind(form.field_id)
    .bind(form.status.as_deref().unwrap_or("planted"))
    .bind(form.area)
    .bind(&form.notes)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(fetch_crop(&state.pool, id).await?))
}

pub async fn update_crop(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<CropForm>,
) -> AgriResult<Json<Crop>> {
    require_modify(&claims, ViewId::Crops)?;
    validation::validate_crop(&form).into_result()?;
    let id = require_id(form.id)?;

    let result = sqlx::query(
        "UPDATE crops SET name = $1, variety = $2, planting_date = $3, expected_harvest_date = $4, \
         field_id = $5, status = $6, area = $7, notes = $8, updated_at = now() WHERE id = $9",
    )
    .bind(&form.name)
    .bind(&form.variety)
    .bind(form.planting_date)
    .bind(form.expected_harvest_date)
    .bind(form.field_id)
    .bind(form.status.as_deref().unwrap_or("planted"))
    .bind(form.area)
    .bind(&form.notes)
    .bind(id)
    .execute(&state.pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(AgriError::NotFound("Crop not found".into()));
    }

    Ok(Json(fetch_crop(&state.pool, id).await?))
}

pub async fn delete_crop(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<IdPayload>,
) -> AgriResult<Json<()>> {
    require_modify(&claims, ViewId::Crops)?;

    let result = sqlx::query("DELETE FROM crops WHERE id = $1")
        .bind(payload.id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AgriError::NotFound("Crop not found".into()));
    }

    Ok(Json(()))
}
