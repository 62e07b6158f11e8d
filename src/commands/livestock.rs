use axum::{extract::State, Extension, Json};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::commands::{require_id, IdPayload};
use crate::db::{DbPool, Livestock};
use crate::error::{AgriError, AgriResult};
use crate::middleware::auth::Claims;
use crate::permissions::{require_modify, ViewId};
use crate::state::AppState;
use crate::validation;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LivestockForm {
    pub id: Option<Uuid>,
    pub animal_type: String,
    pub breed: String,
    pub tag: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub weight: Option<Decimal>,
    pub health_status: Option<String>,
    pub vaccinations: Vec<String>,
    pub reproduction_status: Option<String>,
    pub notes: Option<String>,
}

pub(crate) async fn fetch_livestock(pool: &DbPool) -> AgriResult<Vec<Livestock>> {
    Ok(
        sqlx::query_as::<_, Livestock>("SELECT * FROM livestock ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?,
    )
}

pub async fn list_livestock(State(state): State<AppState>) -> AgriResult<Json<Vec<Livestock>>> {
    Ok(Json(fetch_livestock(&state.pool).await?))
}

pub async fn create_livestock(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<LivestockForm>,
) -> AgriResult<Json<Livestock>> {
    require_modify(&claims, ViewId::Livestock)?;
    validation::validate_livestock(&form).into_result()?;

    let row = sqlx::query_as::<_, Livestock>(
        "INSERT INTO livestock (animal_type, breed, tag, date_of_birth, gender, weight, \
         health_status, vaccinations, reproduction_status, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
    )
    .bind(&form.animal_type)
    .bind(&form.breed)
    .bind(&form.tag)
    .bind(form.date_of_birth)
    .bind(&form.gender)
    .bind(form.weight)
    .bind(form.health_status.as_deref().unwrap_or("healthy"))
    .bind(&form.vaccinations)
    .bind(&form.reproduction_status)
    .bind(&form.notes)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(row))
}

pub async fn update_livestock(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<LivestockForm>,
) -> AgriResult<Json<Livestock>> {
    require_modify(&claims, ViewId::Livestock)?;
    validation::validate_livestock(&form).into_result()?;
    let id = require_id(form.id)?;

    let row = sqlx::query_as::<_, Livestock>(
        "UPDATE livestock SET animal_type = $1, breed = $2, tag = $3, date_of_birth = $4, \
         gender = $5, weight = $6, health_status = $7, vaccinations = $8, \
         reproduction_status = $9, notes = $10, updated_at = now() WHERE id = $11 RETURNING *",
    )
    .bind(&form.animal_type)
    .bind(&form.breed)
    .bind(&form.tag)
    .bind(form.date_of_birth)
    .bind(&form.gender)
    .bind(form.weight)
    .bind(form.health_status.as_deref().unwrap_or("healthy"))
    .bind(&form.vaccinations)
    .bind(&form.reproduction_status)
    .bind(&form.notes)
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AgriError::NotFound("Livestock record not found".into()))?;

    Ok(Json(row))
}

pub async fn delete_livestock(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<IdPayload>,
) -> AgriResult<Json<()>> {
    require_modify(&claims, ViewId::Livestock)?;

    let result = sqlx::query("DELETE FROM livestock WHERE id = $1")
        .bind(payload.id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AgriError::NotFound("Livestock record not found".into()));
    }

    Ok(Json(()))
}
