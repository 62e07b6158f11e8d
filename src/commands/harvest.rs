use axum::{extract::State, Extension, Json};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::commands::{require_id, IdPayload};
use crate::db::{DbPool, Harvest};
use crate::error::{AgriError, AgriResult};
use crate::middleware::auth::Claims;
use crate::permissions::{require_modify, ViewId};
use crate::state::AppState;
use crate::validation;

const HARVEST_SELECT: &str = "SELECT h.*, c.name AS crop_name, f.name AS field_name, \
     p.full_name AS harvested_by_name \
     FROM harvests h \
     LEFT JOIN crops c ON c.id = h.crop_id \
     LEFT JOIN fields f ON f.id = h.field_id \
     LEFT JOIN profiles p ON p.id = h.harvested_by";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestForm {
    pub id: Option<Uuid>,
    pub crop_id: Option<Uuid>,
    pub field_id: Option<Uuid>,
    pub harvest_date: Option<NaiveDate>,
    pub quantity: Decimal,
    pub unit: String,
    pub quality: Option<String>,
    pub storage_location: String,
    pub harvested_by: Option<Uuid>,
    pub notes: Option<String>,
}

pub(crate) async fn fetch_harvests(pool: &DbPool) -> AgriResult<Vec<Harvest>> {
    Ok(
        sqlx::query_as::<_, Harvest>(&format!("{} ORDER BY h.created_at DESC", HARVEST_SELECT))
            .fetch_all(pool)
            .await?,
    )
}

async fn fetch_harvest(pool: &DbPool, id: Uuid) -> AgriResult<Harvest> {
    sqlx::query_as::<_, Harvest>(&format!("{} WHERE h.id = $1", HARVEST_SELECT))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AgriError::NotFound("Harvest not found".into()))
}

pub async fn list_harvests(State(state): State<AppState>) -> AgriResult<Json<Vec<Harvest>>> {
    Ok(Json(fetch_harvests(&state.pool).await?))
}

pub async fn create_harvest(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<HarvestForm>,
) -> AgriResult<Json<Harvest>> {
    require_modify(&claims, ViewId::Harvests)?;
    validation::validate_harvest(&form).into_result()?;

    // Harvests default to being recorded by whoever submits them.
    let harvested_by = form.harvested_by.unwrap_or(claims.user_id);

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO harvests (crop_id, field_id, harvest_date, quantity, unit, quality, \
         storage_location, harvested_by, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING id",
    )
    .bind(form.crop_id)
    .bind(form.field_id)
    .bind(form.harvest_date)
    .bind(form.quantity)
    .bind(&form.unit)
    .bind(form.quality.as_deref().unwrap_or("good"))
    .bind(&form.storage_location)
    .bind(harvested_by)
    .bind(&form.notes)
    .fetch_one(&state.pool)
    .await?;

    // Recording a harvest does not adjust product or input stock; quantity
    // reconciliation is an external boundary handled outside this service.
    Ok(Json(fetch_harvest(&state.pool, id).await?))
}

pub async fn update_harvest(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<HarvestForm>,
) -> AgriResult<Json<Harvest>> {
    require_modify(&claims, ViewId::Harvests)?;
    validation::validate_harvest(&form).into_result()?;
    let id = require_id(form.id)?;

    let result = sqlx::query(
        "UPDATE harvests SET crop_id = $1, field_id = $2, harvest_date = $3, quantity = $4, \
         unit = $5, quality = $6, storage_location = $7, harvested_by = $8, notes = $9, \
         updated_at = now() WHERE id = $10",
    )
    .bind(form.crop_id)
    .bind(form.field_id)
    .bind(form.harvest_date)
    .bind(form.quantity)
    .bind(&form.unit)
    .bind(form.quality.as_deref().unwrap_or("good"))
    .bind(&form.storage_location)
    .bind(form.harvested_by)
    .bind(&form.notes)
    .bind(id)
    .execute(&state.pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(AgriError::NotFound("Harvest not found".into()));
    }

    Ok(Json(fetch_harvest(&state.pool, id).await?))
}

pub async fn delete_harvest(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<IdPayload>,
) -> AgriResult<Json<()>> {
    require_modify(&claims, ViewId::Harvests)?;

    let result = sqlx::query("DELETE FROM harvests WHERE id = $1")
        .bind(payload.id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AgriError::NotFound("Harvest not found".into()));
    }

    Ok(Json(()))
}
