use axum::{extract::State, Extension, Json};
use chrono::Duration;

use crate::db::{DashboardStats, DbPool};
use crate::error::AgriResult;
use crate::middleware::auth::Claims;
use crate::permissions::Role;
use crate::state::AppState;

pub async fn get_dashboard_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AgriResult<Json<DashboardStats>> {
    Ok(Json(dashboard_stats(&state.pool, &claims).await?))
}

/// Stats are shaped by role: management sees the whole farm plus revenue,
/// staff see the farm plus their own task load, customers see the shop side.
pub(crate) async fn dashboard_stats(pool: &DbPool, claims: &Claims) -> AgriResult<DashboardStats> {
    let today = chrono::Local::now().date_naive();

    let stats = match claims.role() {
        Role::Admin | Role::Manager => {
            let week_ago = today - Duration::days(7);
            sqlx::query_as::<_, DashboardStats>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM fields) AS total_fields,
                    (SELECT COUNT(*) FROM crops WHERE status != 'harvested') AS active_crops,
                    (SELECT COUNT(*) FROM livestock WHERE health_status = 'healthy') AS healthy_livestock,
                    (SELECT COUNT(*) FROM inputs WHERE quantity_in_stock <= reorder_level) AS low_stock_inputs,
                    (SELECT COUNT(*) FROM products WHERE status = 'available') AS available_products,
                    (SELECT COUNT(*) FROM tasks WHERE status IN ('pending', 'in-progress')) AS pending_tasks,
                    (SELECT COUNT(*) FROM sales WHERE sale_date >= $1) AS recent_sales_count,
                    (SELECT COALESCE(SUM(total_amount), 0) FROM sales) AS total_revenue,
                    NULL::bigint AS my_pending_tasks,
                    NULL::bigint AS inputs_in_stock,
                    NULL::bigint AS my_orders,
                    NULL::numeric AS total_spent
                "#,
            )
            .bind(week_ago)
            .fetch_one(pool)
            .await?
        }
        Role::Staff => {
            sqlx::query_as::<_, DashboardStats>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM fields) AS total_fields,
                    (SELECT COUNT(*) FROM crops WHERE status != 'harvested') AS active_crops,
                    (SELECT COUNT(*) FROM livestock WHERE health_status = 'healthy') AS healthy_livestock,
                    (SELECT COUNT(*) FROM inputs WHERE quantity_in_stock <= reorder_level) AS low_stock_inputs,
                    (SELECT COUNT(*) FROM products WHERE status = 'available') AS available_products,
                    (SELECT COUNT(*) FROM tasks WHERE status IN ('pending', 'in-progress')) AS pending_tasks,
                    NULL::bigint AS recent_sales_count,
                    NULL::numeric AS total_revenue,
                    (SELECT COUNT(*) FROM tasks WHERE assigned_to = $1 AND status IN ('pending', 'in-progress')) AS my_pending_tasks,
                    (SELECT COUNT(*) FROM inputs WHERE quantity_in_stock > 0) AS inputs_in_stock,
                    NULL::bigint AS my_orders,
                    NULL::numeric AS total_spent
                "#,
            )
            .bind(claims.user_id)
            .fetch_one(pool)
            .await?
        }
        Role::Customer => {
            sqlx::query_as::<_, DashboardStats>(
                r#"
                SELECT
                    NULL::bigint AS total_fields,
                    NULL::bigint AS active_crops,
                    NULL::bigint AS healthy_livestock,
                    NULL::bigint AS low_stock_inputs,
                    (SELECT COUNT(*) FROM products WHERE status = 'available' AND quantity_available > 0) AS available_products,
                    NULL::bigint AS pending_tasks,
                    NULL::bigint AS recent_sales_count,
                    NULL::numeric AS total_revenue,
                    NULL::bigint AS my_pending_tasks,
                    NULL::bigint AS inputs_in_stock,
                    (SELECT COUNT(*) FROM sales WHERE customer_name = $1 OR customer_phone = $2) AS my_orders,
                    (SELECT COALESCE(SUM(total_amount), 0) FROM sales WHERE customer_name = $1 OR customer_phone = $2) AS total_spent
                "#,
            )
            .bind(&claims.full_name)
            .bind(&claims.phone)
            .fetch_one(pool)
            .await?
        }
    };

    Ok(stats)
}
