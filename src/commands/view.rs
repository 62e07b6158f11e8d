use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::commands::{crop, customer, dashboard, field, harvest, input, livestock, product, sale, task};
use crate::db::{
    Crop, Customer, FarmInput, Field, Harvest, HarvestByCrop, Livestock, Product, RevenueByMonth,
    Sale, SalesByProduct, Task,
};
use crate::error::AgriResult;
use crate::middleware::auth::Claims;
use crate::permissions::{nav_items, require_view, Role, ViewId};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct NavItem {
    pub id: ViewId,
    pub label: &'static str,
}

pub async fn get_nav(Extension(claims): Extension<Claims>) -> Json<Vec<NavItem>> {
    let items = nav_items(claims.role())
        .into_iter()
        .map(|id| NavItem {
            id,
            label: id.label(),
        })
        .collect();
    Json(items)
}

/// Resolves a navigation identifier to its view payload: the kind's rows
/// paired with the summary aggregates its table header shows.
pub async fn resolve_view(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(view): Path<String>,
) -> AgriResult<Json<Value>> {
    // Unrecognized identifiers cannot be reached through role-filtered
    // navigation; the fallback mirrors the default screen.
    let view = view.parse::<ViewId>().unwrap_or(ViewId::Dashboard);
    require_view(&claims, view)?;

    let pool = &state.pool;
    let today = chrono::Local::now().date_naive();

    let payload = match view {
        ViewId::Dashboard => {
            let stats = dashboard::dashboard_stats(pool, &claims).await?;
            json!({ "view": view, "stats": stats })
        }
        ViewId::Fields => {
            let rows = field::fetch_fields(pool).await?;
            json!({ "view": view, "summary": field_summary(&rows), "rows": rows })
        }
        ViewId::Crops => {
            let rows = crop::fetch_crops(pool).await?;
            json!({ "view": view, "summary": crop_summary(&rows), "rows": rows })
        }
        ViewId::Livestock => {
            let rows = livestock::fetch_livestock(pool).await?;
            json!({ "view": view, "summary": livestock_summary(&rows), "rows": rows })
        }
        ViewId::Inputs => {
            let rows = input::fetch_inputs(pool).await?;
            json!({ "view": view, "summary": input_summary(&rows), "rows": rows })
        }
        ViewId::Products => {
            let rows = product::fetch_products(pool).await?;
            json!({ "view": view, "summary": product_summary(&rows), "rows": rows })
        }
        ViewId::Harvests => {
            let rows = harvest::fetch_harvests(pool).await?;
            json!({ "view": view, "summary": harvest_summary(&rows), "rows": rows })
        }
        ViewId::Sales => {
            let rows = sale::fetch_sales(pool).await?;
            json!({ "view": view, "summary": sales_summary(&rows, today), "rows": rows })
        }
        ViewId::Tasks => {
            let mut rows = task::fetch_tasks(pool).await?;
            // Staff only see their own assignments.
            if claims.role() == Role::Staff {
                rows.retain(|t| t.assigned_to == Some(claims.user_id));
            }
            json!({ "view": view, "summary": task_summary(&rows, today), "rows": rows })
        }
        ViewId::Reports => {
            let revenue_by_month: Vec<RevenueByMonth> = sqlx::query_as(
                "SELECT to_char(sale_date, 'YYYY-MM') AS month, COUNT(*) AS order_count, \
                 COALESCE(SUM(total_amount), 0) AS total_revenue \
                 FROM sales GROUP BY 1 ORDER BY 1",
            )
            .fetch_all(pool)
            .await?;
            let harvests_by_crop: Vec<HarvestByCrop> = sqlx::query_as(
                "SELECT COALESCE(c.name, 'Unknown') AS crop_name, COUNT(*) AS harvest_count, \
                 COALESCE(SUM(h.quantity), 0) AS total_quantity \
                 FROM harvests h LEFT JOIN crops c ON c.id = h.crop_id \
                 GROUP BY 1 ORDER BY total_quantity DESC",
            )
            .fetch_all(pool)
            .await?;
            let sales_by_product: Vec<SalesByProduct> = sqlx::query_as(
                "SELECT COALESCE(p.name, 'Unknown') AS product_name, \
                 COALESCE(SUM(s.quantity), 0) AS units_sold, \
                 COALESCE(SUM(s.total_amount), 0) AS total_revenue \
                 FROM sales s LEFT JOIN products p ON p.id = s.product_id \
                 GROUP BY 1 ORDER BY total_revenue DESC",
            )
            .fetch_all(pool)
            .await?;
            json!({
                "view": view,
                "revenue_by_month": revenue_by_month,
                "harvests_by_crop": harvests_by_crop,
                "sales_by_product": sales_by_product,
            })
        }
        ViewId::Customers => {
            let rows = customer::fetch_customers(pool).await?;
            json!({ "view": view, "summary": customer_summary(&rows), "rows": rows })
        }
        ViewId::Marketplace => {
            let rows = product::fetch_available_products(pool).await?;
            let product_types: Vec<String> = {
                let mut types: Vec<String> =
                    rows.iter().map(|p| p.product_type.clone()).collect();
                types.sort();
                types.dedup();
                types
            };
            json!({ "view": view, "product_types": product_types, "rows": rows })
        }
        ViewId::MyOrders => {
            let sales = sale::fetch_sales(pool).await?;
            let rows = my_orders(sales, &claims);
            json!({ "view": view, "summary": my_orders_summary(&rows), "rows": rows })
        }
    };

    Ok(Json(payload))
}

pub fn field_summary(fields: &[Field]) -> Value {
    let active = fields.iter().filter(|f| f.status == "active").count();
    let total_acreage: Decimal = fields.iter().map(|f| f.size).sum();
    let irrigated = fields
        .iter()
        .filter(|f| f.irrigation_system.as_deref().map_or(false, |s| !s.is_empty()))
        .count();
    json!({
        "total": fields.len(),
        "active": active,
        "total_acreage": total_acreage,
        "irrigated": irrigated,
    })
}

pub fn crop_summary(crops: &[Crop]) -> Value {
    let growing = crops.iter().filter(|c| c.status != "harvested").count();
    let total_area: Decimal = crops.iter().map(|c| c.area).sum();
    json!({
        "total": crops.len(),
        "growing": growing,
        "total_area": total_area,
    })
}

pub fn livestock_summary(livestock: &[Livestock]) -> Value {
    let healthy = livestock.iter().filter(|l| l.health_status == "healthy").count();
    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    for animal in livestock {
        *by_type.entry(animal.animal_type.as_str()).or_default() += 1;
    }
    json!({
        "total": livestock.len(),
        "healthy": healthy,
        "by_type": by_type,
    })
}

pub fn input_summary(inputs: &[FarmInput]) -> Value {
    let low_stock = inputs
        .iter()
        .filter(|i| i.quantity_in_stock <= i.reorder_level)
        .count();
    let stock_value: Decimal = inputs
        .iter()
        .map(|i| i.quantity_in_stock * i.cost_per_unit)
        .sum();
    json!({
        "total": inputs.len(),
        "low_stock": low_stock,
        "stock_value": stock_value,
    })
}

pub fn product_summary(products: &[Product]) -> Value {
    let available = products.iter().filter(|p| p.status == "available").count();
    let inventory_value: Decimal = products
        .iter()
        .map(|p| p.quantity_available * p.price_per_unit)
        .sum();
    json!({
        "total": products.len(),
        "available": available,
        "inventory_value": inventory_value,
    })
}

pub fn harvest_summary(harvests: &[Harvest]) -> Value {
    let mut quantity_by_quality: BTreeMap<&str, Decimal> = BTreeMap::new();
    for harvest in harvests {
        *quantity_by_quality
            .entry(harvest.quality.as_str())
            .or_insert(Decimal::ZERO) += harvest.quantity;
    }
    json!({
        "total": harvests.len(),
        "quantity_by_quality": quantity_by_quality,
    })
}

pub fn sales_summary(sales: &[Sale], today: NaiveDate) -> Value {
    let week_ago = today - Duration::days(7);
    let total_revenue: Decimal = sales.iter().map(|s| s.total_amount).sum();
    let paid = sales.iter().filter(|s| s.payment_status == "paid").count();
    let pending_deliveries = sales.iter().filter(|s| s.delivery_status == "pending").count();
    let recent: Vec<&Sale> = sales.iter().filter(|s| s.sale_date >= week_ago).collect();
    let recent_revenue: Decimal = recent.iter().map(|s| s.total_amount).sum();
    let mut by_payment_method: BTreeMap<&str, usize> = BTreeMap::new();
    for sale in sales {
        *by_payment_method.entry(sale.payment_method.as_str()).or_default() += 1;
    }
    json!({
        "total": sales.len(),
        "total_revenue": total_revenue,
        "paid": paid,
        "pending_deliveries": pending_deliveries,
        "recent_count": recent.len(),
        "recent_revenue": recent_revenue,
        "by_payment_method": by_payment_method,
    })
}

pub fn task_summary(tasks: &[Task], today: NaiveDate) -> Value {
    let pending = tasks.iter().filter(|t| t.status == "pending").count();
    let in_progress = tasks.iter().filter(|t| t.status == "in-progress").count();
    let completed = tasks.iter().filter(|t| t.status == "completed").count();
    let overdue = tasks
        .iter()
        .filter(|t| t.due_date < today && t.status != "completed" && t.status != "cancelled")
        .count();
    json!({
        "total": tasks.len(),
        "pending": pending,
        "in_progress": in_progress,
        "completed": completed,
        "overdue": overdue,
    })
}

pub fn customer_summary(customers: &[Customer]) -> Value {
    json!({ "total": customers.len() })
}

pub fn my_orders(sales: Vec<Sale>, claims: &Claims) -> Vec<Sale> {
    sales
        .into_iter()
        .filter(|s| {
            s.customer_name == claims.full_name
                || (claims.phone.is_some() && s.customer_phone == claims.phone)
        })
        .collect()
}

pub fn my_orders_summary(orders: &[Sale]) -> Value {
    let total_spent: Decimal = orders.iter().map(|o| o.total_amount).sum();
    let pending = orders.iter().filter(|o| o.delivery_status == "pending").count();
    let completed = orders
        .iter()
        .filter(|o| o.delivery_status == "delivered" || o.delivery_status == "picked_up")
        .count();
    json!({
        "total": orders.len(),
        "total_spent": total_spent,
        "pending": pending,
        "completed": completed,
    })
}
