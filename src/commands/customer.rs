use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::commands::{require_id, IdPayload};
use crate::db::{Customer, DbPool};
use crate::error::{AgriError, AgriResult};
use crate::middleware::auth::Claims;
use crate::permissions::{require_modify, ViewId};
use crate::state::AppState;
use crate::validation;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerForm {
    pub id: Option<Uuid>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub(crate) async fn fetch_customers(pool: &DbPool) -> AgriResult<Vec<Customer>> {
    Ok(
        sqlx::query_as::<_, Customer>("SELECT * FROM customers ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?,
    )
}

pub async fn list_customers(State(state): State<AppState>) -> AgriResult<Json<Vec<Customer>>> {
    Ok(Json(fetch_customers(&state.pool).await?))
}

pub async fn create_customer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<CustomerForm>,
) -> AgriResult<Json<Customer>> {
    require_modify(&claims, ViewId::Customers)?;
    validation::validate_customer(&form).into_result()?;

    let row = sqlx::query_as::<_, Customer>(
        "INSERT INTO customers (name, email, phone, address) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&form.name)
    .bind(&form.email)
    .bind(&form.phone)
    .bind(&form.address)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(row))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<CustomerForm>,
) -> AgriResult<Json<Customer>> {
    require_modify(&claims, ViewId::Customers)?;
    validation::validate_customer(&form).into_result()?;
    let id = require_id(form.id)?;

    let row = sqlx::query_as::<_, Customer>(
        "UPDATE customers SET name = $1, email = $2, phone = $3, address = $4, \
         updated_at = now() WHERE id = $5 RETURNING *",
    )
    .bind(&form.name)
    .bind(&form.email)
    .bind(&form.phone)
    .bind(&form.address)
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AgriError::NotFound("Customer not found".into()))?;

    Ok(Json(row))
}

/// Sales referencing the customer keep their rows; the foreign key is set
/// NULL and the sales view falls back to the stored customer_name.
pub async fn delete_customer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<IdPayload>,
) -> AgriResult<Json<()>> {
    require_modify(&claims, ViewId::Customers)?;

    let result = sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(payload.id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AgriError::NotFound("Customer not found".into()));
    }

    Ok(Json(()))
}
