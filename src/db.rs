use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{FromRow, Pool, Postgres};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{AgriError, AgriResult};

pub type DbPool = Pool<Postgres>;

pub async fn init_pool_with_options(opts: PgConnectOptions) -> AgriResult<DbPool> {
    // connect_lazy_with returns the pool immediately without validating the connection.
    Ok(PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .idle_timeout(std::time::Duration::from_secs(120))
        .max_lifetime(std::time::Duration::from_secs(300))
        .connect_lazy_with(opts))
}

pub async fn init_pool(database_url: &str) -> AgriResult<DbPool> {
    let opts = PgConnectOptions::from_str(database_url)
        .map_err(|e| AgriError::Internal(format!("Invalid DB URL: {}", e)))?
        .ssl_mode(PgSslMode::Disable);

    init_pool_with_options(opts).await
}

pub async fn init_database(pool: &DbPool) -> AgriResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    ensure_seeds(pool).await?;
    tracing::info!("Database ready");
    Ok(())
}

/// Demo accounts only. The fixed usernames, emails and passwords exist so the
/// four roles can be exercised out of the box; this is a development
/// convenience, not an identity system.
const DEMO_PROFILES: &[(&str, &str, &str, &str, &str)] = &[
    ("admin", "admin@farm.zm", "admin123", "admin", "Alice Admin"),
    ("manager", "manager@farm.zm", "manager123", "manager", "Mary Manager"),
    ("staff", "staff@farm.zm", "staff123", "staff", "Sam Staff"),
    ("customer", "customer@farm.zm", "customer123", "customer", "Carol Customer"),
];

async fn ensure_seeds(pool: &DbPool) -> AgriResult<()> {
    for &(username, email, password, role, full_name) in DEMO_PROFILES {
        let exists: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles WHERE username = $1")
            .bind(username)
            .fetch_one(pool)
            .await
            .unwrap_or((0,));
        if exists.0 == 0 {
            if let Ok(hash) = bcrypt::hash(password, bcrypt::DEFAULT_COST) {
                let _ = sqlx::query(
                    "INSERT INTO profiles (username, email, password_hash, role, full_name) \
                     VALUES ($1, $2, $3, $4, $5) ON CONFLICT DO NOTHING",
                )
                .bind(username)
                .bind(email)
                .bind(hash)
                .bind(role)
                .bind(full_name)
                .execute(pool)
                .await;
            }
        }
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Field {
    pub id: Uuid,
    pub name: String,
    pub size: Decimal,
    pub location: String,
    pub soil_type: String,
    pub irrigation_system: Option<String>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Crop {
    pub id: Uuid,
    pub name: String,
    pub variety: String,
    pub planting_date: NaiveDate,
    pub expected_harvest_date: NaiveDate,
    pub field_id: Option<Uuid>,
    pub status: String,
    pub area: Decimal,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub updated_at: Option<DateTime<Utc>>,
    // Joined from fields; None when the referenced field was deleted.
    #[sqlx(default)]
    pub field_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Livestock {
    pub id: Uuid,
    pub animal_type: String,
    pub breed: String,
    pub tag: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub weight: Option<Decimal>,
    pub health_status: String,
    pub vaccinations: Vec<String>,
    pub reproduction_status: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct FarmInput {
    pub id: Uuid,
    pub name: String,
    pub input_type: String,
    pub supplier: String,
    pub quantity_in_stock: Decimal,
    pub unit: String,
    pub cost_per_unit: Decimal,
    pub reorder_level: Decimal,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub product_type: String,
    pub description: String,
    pub price_per_unit: Decimal,
    pub unit: String,
    pub quantity_available: Decimal,
    pub harvest_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Harvest {
    pub id: Uuid,
    pub crop_id: Option<Uuid>,
    pub field_id: Option<Uuid>,
    pub harvest_date: NaiveDate,
    pub quantity: Decimal,
    pub unit: String,
    pub quality: String,
    pub storage_location: String,
    pub harvested_by: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub updated_at: Option<DateTime<Utc>>,
    // Joined display names; None when the referenced row was deleted.
    #[sqlx(default)]
    pub crop_name: Option<String>,
    #[sqlx(default)]
    pub field_name: Option<String>,
    #[sqlx(default)]
    pub harvested_by_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub assigned_to: Option<Uuid>,
    pub assigned_by: Option<Uuid>,
    pub priority: String,
    pub status: String,
    pub due_date: NaiveDate,
    pub start_date: Option<NaiveDate>,
    pub completed_date: Option<NaiveDate>,
    pub field_id: Option<Uuid>,
    pub crop_id: Option<Uuid>,
    pub livestock_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub assigned_to_name: Option<String>,
    #[sqlx(default)]
    pub assigned_by_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Sale {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub quantity: Decimal,
    pub price_per_unit: Decimal,
    pub total_amount: Decimal,
    pub sale_date: NaiveDate,
    pub payment_method: String,
    pub payment_status: String,
    pub delivery_status: String,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub updated_at: Option<DateTime<Utc>>,
    // Joined from products; None when the referenced product was deleted.
    #[sqlx(default)]
    pub product_name: Option<String>,
    #[sqlx(default)]
    pub product_unit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Default)]
pub struct DashboardStats {
    pub total_fields: Option<i64>,
    pub active_crops: Option<i64>,
    pub healthy_livestock: Option<i64>,
    pub low_stock_inputs: Option<i64>,
    pub available_products: Option<i64>,
    pub pending_tasks: Option<i64>,
    pub recent_sales_count: Option<i64>,
    pub total_revenue: Option<Decimal>,
    pub my_pending_tasks: Option<i64>,
    pub inputs_in_stock: Option<i64>,
    pub my_orders: Option<i64>,
    pub total_spent: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct RevenueByMonth {
    pub month: String,
    pub order_count: i64,
    pub total_revenue: Decimal,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct HarvestByCrop {
    pub crop_name: String,
    pub harvest_count: i64,
    pub total_quantity: Decimal,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct SalesByProduct {
    pub product_name: String,
    pub units_sold: Decimal,
    pub total_revenue: Decimal,
}
