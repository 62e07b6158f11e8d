use axum::{extract::State, Extension, Json};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::commands::{require_id, IdPayload};
use crate::db::{DbPool, Product};
use crate::error::{AgriError, AgriResult};
use crate::middleware::auth::Claims;
use crate::permissions::{require_modify, ViewId};
use crate::state::AppState;
use crate::validation;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub id: Option<Uuid>,
    pub name: String,
    pub product_type: String,
    pub description: String,
    pub price_per_unit: Decimal,
    pub unit: String,
    pub quantity_available: Decimal,
    pub harvest_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub status: Option<String>,
}

pub(crate) async fn fetch_products(pool: &DbPool) -> AgriResult<Vec<Product>> {
    Ok(
        sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?,
    )
}

pub(crate) async fn fetch_available_products(pool: &DbPool) -> AgriResult<Vec<Product>> {
    Ok(sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE status = 'available' AND quantity_available > 0 \
         ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?)
}

pub async fn list_products(State(state): State<AppState>) -> AgriResult<Json<Vec<Product>>> {
    Ok(Json(fetch_products(&state.pool).await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<ProductForm>,
) -> AgriResult<Json<Product>> {
    require_modify(&claims, ViewId::Products)?;
    validation::validate_product(&form).into_result()?;

    let row = sqlx::query_as::<_, Product>(
        "INSERT INTO products (name, product_type, description, price_per_unit, unit, \
         quantity_available, harvest_date, expiry_date, status) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
    )
    .bind(&form.name)
    .bind(&form.product_type)
    .bind(&form.description)
    .bind(form.price_per_unit)
    .bind(&form.unit)
    .bind(form.quantity_available)
    .bind(form.harvest_date)
    .bind(form.expiry_date)
    .bind(form.status.as_deref().unwrap_or("available"))
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(row))
}

pub async fn update_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<ProductForm>,
) -> AgriResult<Json<Product>> {
    require_modify(&claims, ViewId::Products)?;
    validation::validate_product(&form).into_result()?;
    let id = require_id(form.id)?;

    let row = sqlx::query_as::<_, Product>(
        "UPDATE products SET name = $1, product_type = $2, description = $3, price_per_unit = $4, \
         unit = $5, quantity_available = $6, harvest_date = $7, expiry_date = $8, status = $9, \
         updated_at = now() WHERE id = $10 RETURNING *",
    )
    .bind(&form.name)
    .bind(&form.product_type)
    .bind(&form.description)
    .bind(form.price_per_unit)
    .bind(&form.unit)
    .bind(form.quantity_available)
    .bind(form.harvest_date)
    .bind(form.expiry_date)
    .bind(form.status.as_deref().unwrap_or("available"))
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AgriError::NotFound("Product not found".into()))?;

    Ok(Json(row))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<IdPayload>,
) -> AgriResult<Json<()>> {
    require_modify(&claims, ViewId::Products)?;

    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(payload.id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AgriError::NotFound("Product not found".into()));
    }

    Ok(Json(()))
}
