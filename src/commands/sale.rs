use axum::{extract::State, Extension, Json};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::commands::{require_id, IdPayload};
use crate::db::{DbPool, Product, Sale};
use crate::error::{AgriError, AgriResult};
use crate::middleware::auth::Claims;
use crate::permissions::{require_modify, ViewId};
use crate::state::AppState;
use crate::validation::{self, ValidationErrors};

const SALE_SELECT: &str = "SELECT s.*, p.name AS product_name, p.unit AS product_unit \
     FROM sales s LEFT JOIN products p ON p.id = s.product_id";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SaleForm {
    pub id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub quantity: Decimal,
    pub price_per_unit: Decimal,
    pub total_amount: Decimal,
    pub sale_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
    pub delivery_status: Option<String>,
    pub notes: Option<String>,
}

/// Marketplace order submission. Customers only supply the product, the
/// quantity and their contact details; pricing is snapshotted server-side.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderForm {
    pub product_id: Option<Uuid>,
    pub quantity: Decimal,
    pub customer_name: String,
    pub customer_phone: Option<String>,
}

pub(crate) async fn fetch_sales(pool: &DbPool) -> AgriResult<Vec<Sale>> {
    Ok(
        sqlx::query_as::<_, Sale>(&format!("{} ORDER BY s.created_at DESC", SALE_SELECT))
            .fetch_all(pool)
            .await?,
    )
}

async fn fetch_sale(pool: &DbPool, id: Uuid) -> AgriResult<Sale> {
    sqlx::query_as::<_, Sale>(&format!("{} WHERE s.id = $1", SALE_SELECT))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AgriError::NotFound("Sale not found".into()))
}

pub async fn list_sales(State(state): State<AppState>) -> AgriResult<Json<Vec<Sale>>> {
    Ok(Json(fetch_sales(&state.pool).await?))
}

pub async fn create_sale(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<SaleForm>,
) -> AgriResult<Json<Sale>> {
    require_modify(&claims, ViewId::Sales)?;
    validation::validate_sale(&form).into_result()?;

    let id = insert_sale(&state.pool, &form).await?;
    Ok(Json(fetch_sale(&state.pool, id).await?))
}

async fn insert_sale(pool: &DbPool, form: &SaleForm) -> AgriResult<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO sales (product_id, customer_id, customer_name, customer_phone, quantity, \
         price_per_unit, total_amount, sale_date, payment_method, payment_status, \
         delivery_status, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING id",
    )
    .bind(form.product_id)
    .bind(form.customer_id)
    .bind(&form.customer_name)
    .bind(&form.customer_phone)
    .bind(form.quantity)
    .bind(form.price_per_unit)
    .bind(form.total_amount)
    .bind(form.sale_date)
    .bind(form.payment_method.as_deref().unwrap_or("cash"))
    .bind(form.payment_status.as_deref().unwrap_or("pending"))
    .bind(form.delivery_status.as_deref().unwrap_or("pending"))
    .bind(&form.notes)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn update_sale(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<SaleForm>,
) -> AgriResult<Json<Sale>> {
    require_modify(&claims, ViewId::Sales)?;
    validation::validate_sale(&form).into_result()?;
    let id = require_id(form.id)?;

    let result = sqlx::query(
        "UPDATE sales SET product_id = $1, customer_id = $2, customer_name = $3, \
         customer_phone = $4, quantity = $5, price_per_unit = $6, total_amount = $7, \
         sale_date = $8, payment_method = $9, payment_status = $10, delivery_status = $11, \
         notes = $12, updated_at = now() WHERE id = $13",
    )
    .bind(form.product_id)
    .bind(form.customer_id)
    .bind(&form.customer_name)
    .bind(&form.customer_phone)
    .bind(form.quantity)
    .bind(form.price_per_unit)
    .bind(form.total_amount)
    .bind(form.sale_date)
    .bind(form.payment_method.as_deref().unwrap_or("cash"))
    .bind(form.payment_status.as_deref().unwrap_or("pending"))
    .bind(form.delivery_status.as_deref().unwrap_or("pending"))
    .bind(&form.notes)
    .bind(id)
    .execute(&state.pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(AgriError::NotFound("Sale not found".into()));
    }

    Ok(Json(fetch_sale(&state.pool, id).await?))
}

pub async fn delete_sale(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<IdPayload>,
) -> AgriResult<Json<()>> {
    require_modify(&claims, ViewId::Sales)?;

    let result = sqlx::query("DELETE FROM sales WHERE id = $1")
        .bind(payload.id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AgriError::NotFound("Sale not found".into()));
    }

    Ok(Json(()))
}

pub async fn place_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<OrderForm>,
) -> AgriResult<Json<Sale>> {
    require_modify(&claims, ViewId::Marketplace)?;
    validation::validate_order(&form).into_result()?;

    let Some(product_id) = form.product_id else {
        return Err(AgriError::NotFound("Product not found".into()));
    };
    let product: Product = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AgriError::NotFound("Product not found".into()))?;

    if product.status != "available" || product.quantity_available < form.quantity {
        let mut errors = ValidationErrors::default();
        errors.add(
            "quantity",
            format!(
                "Only {} {} of {} available",
                product.quantity_available, product.unit, product.name
            ),
        );
        return Err(AgriError::Validation(errors));
    }

    let today = chrono::Local::now().date_naive();
    let sale = SaleForm {
        id: None,
        product_id: Some(product_id),
        customer_id: None,
        customer_name: form.customer_name.clone(),
        customer_phone: form.customer_phone.clone(),
        quantity: form.quantity,
        price_per_unit: product.price_per_unit,
        total_amount: form.quantity * product.price_per_unit,
        sale_date: Some(today),
        payment_method: Some("pending".to_string()),
        payment_status: Some("pending".to_string()),
        delivery_status: Some("pending".to_string()),
        notes: Some(format!("Order from marketplace by {}", form.customer_name)),
    };

    // Product stock is intentionally not decremented here; order fulfilment
    // and stock reconciliation happen outside this service.
    let id = insert_sale(&state.pool, &sale).await?;
    Ok(Json(fetch_sale(&state.pool, id).await?))
}
