#[cfg(test)]
mod tests {
    use axum::extract::{Path, State};
    use axum::{Extension, Json};
    use rust_decimal::Decimal;

    use crate::commands::customer::CustomerForm;
    use crate::commands::field::{self, FieldForm};
    use crate::commands::product::ProductForm;
    use crate::commands::sale::{self, OrderForm, SaleForm};
    use crate::commands::view;
    use crate::commands::{auth, customer, product, IdPayload};
    use crate::db::{self, DbPool, Profile};
    use crate::error::AgriError;
    use crate::middleware::auth::Claims;
    use crate::state::AppState;

    /// Integration tests need a reachable Postgres. Without DATABASE_URL they
    /// skip instead of failing, so the pure-logic suite stays runnable anywhere.
    async fn setup_test_db() -> Option<DbPool> {
        dotenvy::dotenv().ok();
        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("skipping: DATABASE_URL not set");
                return None;
            }
        };
        let pool = db::init_pool(&database_url)
            .await
            .expect("Failed to create pool");
        db::init_database(&pool)
            .await
            .expect("Failed to initialize database");
        Some(pool)
    }

    async fn claims_for(pool: &DbPool, username: &str) -> Claims {
        let profile: Profile = sqlx::query_as("SELECT * FROM profiles WHERE username = $1")
            .bind(username)
            .fetch_one(pool)
            .await
            .expect("demo profile missing");
        Claims {
            sub: profile.id.to_string(),
            user_id: profile.id,
            username: profile.username,
            role: profile.role,
            full_name: profile.full_name,
            phone: profile.phone,
            exp: 0,
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn state_for(pool: &DbPool) -> State<AppState> {
        State(AppState { pool: pool.clone() })
    }

    #[tokio::test]
    async fn test_create_field_defaults_to_active() {
        let Some(pool) = setup_test_db().await else { return };
        let admin = claims_for(&pool, "admin").await;

        let form = FieldForm {
            id: None,
            name: "North Field".to_string(),
            size: dec("12.5"),
            location: "Plot 9".to_string(),
            soil_type: "loam".to_string(),
            irrigation_system: None,
            status: None,
        };
        let Json(created) = field::create_field(state_for(&pool), Extension(admin.clone()), Json(form))
            .await
            .expect("create_field failed");

        assert_eq!(created.name, "North Field");
        assert_eq!(created.size, dec("12.5"));
        assert_eq!(created.location, "Plot 9");
        assert_eq!(created.soil_type, "loam");
        assert_eq!(created.status, "active");

        let fields = field::fetch_fields(&pool).await.unwrap();
        let matching: Vec<_> = fields.iter().filter(|f| f.id == created.id).collect();
        assert_eq!(matching.len(), 1);

        let _ = field::delete_field(
            state_for(&pool),
            Extension(admin),
            Json(IdPayload { id: created.id }),
        )
        .await;
    }

    #[tokio::test]
    async fn test_invalid_field_is_rejected_without_insert() {
        let Some(pool) = setup_test_db().await else { return };
        let admin = claims_for(&pool, "admin").await;

        let before = field::fetch_fields(&pool).await.unwrap().len();

        let form = FieldForm {
            size: dec("-4"),
            ..Default::default()
        };
        let result = field::create_field(state_for(&pool), Extension(admin), Json(form)).await;
        assert!(matches!(result, Err(AgriError::Validation(_))));

        let after = field::fetch_fields(&pool).await.unwrap().len();
        assert_eq!(before, after, "validation failure must not insert a row");
    }

    #[tokio::test]
    async fn test_delete_customer_keeps_sales_renderable() {
        let Some(pool) = setup_test_db().await else { return };
        let admin = claims_for(&pool, "admin").await;

        let Json(created_customer) = customer::create_customer(
            state_for(&pool),
            Extension(admin.clone()),
            Json(CustomerForm {
                name: "Orphaned Sales Customer".to_string(),
                phone: Some("0971-555-000".to_string()),
                ..Default::default()
            }),
        )
        .await
        .expect("create_customer failed");

        let Json(created_sale) = sale::create_sale(
            state_for(&pool),
            Extension(admin.clone()),
            Json(SaleForm {
                customer_id: Some(created_customer.id),
                customer_name: created_customer.name.clone(),
                quantity: dec("2"),
                price_per_unit: dec("50"),
                total_amount: dec("100"),
                sale_date: Some(chrono::Local::now().date_naive()),
                payment_method: Some("cash".to_string()),
                ..Default::default()
            }),
        )
        .await
        .expect("create_sale failed");
        assert_eq!(created_sale.customer_id, Some(created_customer.id));

        customer::delete_customer(
            state_for(&pool),
            Extension(admin.clone()),
            Json(IdPayload {
                id: created_customer.id,
            }),
        )
        .await
        .expect("delete_customer failed");

        // The sale survives with a null customer reference and the list still loads.
        let sales = sale::fetch_sales(&pool).await.unwrap();
        let orphan = sales
            .iter()
            .find(|s| s.id == created_sale.id)
            .expect("sale disappeared with its customer");
        assert_eq!(orphan.customer_id, None);
        assert_eq!(orphan.customer_name, "Orphaned Sales Customer");

        let _ = sale::delete_sale(
            state_for(&pool),
            Extension(admin),
            Json(IdPayload { id: created_sale.id }),
        )
        .await;
    }

    #[tokio::test]
    async fn test_marketplace_order_snapshots_price_and_keeps_stock() {
        let Some(pool) = setup_test_db().await else { return };
        let admin = claims_for(&pool, "admin").await;
        let shopper = claims_for(&pool, "customer").await;

        let Json(created_product) = product::create_product(
            state_for(&pool),
            Extension(admin.clone()),
            Json(ProductForm {
                name: "Fresh Maize".to_string(),
                product_type: "grain".to_string(),
                unit: "kg".to_string(),
                price_per_unit: dec("30"),
                quantity_available: dec("100"),
                ..Default::default()
            }),
        )
        .await
        .expect("create_product failed");

        let Json(order) = sale::place_order(
            state_for(&pool),
            Extension(shopper.clone()),
            Json(OrderForm {
                product_id: Some(created_product.id),
                quantity: dec("5"),
                customer_name: shopper.full_name.clone(),
                customer_phone: None,
            }),
        )
        .await
        .expect("place_order failed");

        assert_eq!(order.payment_method, "pending");
        assert_eq!(order.payment_status, "pending");
        assert_eq!(order.total_amount, dec("150"));
        assert_eq!(order.product_name.as_deref(), Some("Fresh Maize"));

        // Stock reconciliation is an external boundary; ordering must not touch it.
        let products = product::fetch_products(&pool).await.unwrap();
        let unchanged = products.iter().find(|p| p.id == created_product.id).unwrap();
        assert_eq!(unchanged.quantity_available, dec("100"));

        // The customer's own orders view picks the sale up by full name.
        let mine = view::my_orders(sale::fetch_sales(&pool).await.unwrap(), &shopper);
        assert!(mine.iter().any(|s| s.id == order.id));

        let _ = sale::delete_sale(
            state_for(&pool),
            Extension(admin.clone()),
            Json(IdPayload { id: order.id }),
        )
        .await;
        let _ = product::delete_product(
            state_for(&pool),
            Extension(admin),
            Json(IdPayload {
                id: created_product.id,
            }),
        )
        .await;
    }

    #[tokio::test]
    async fn test_oversized_order_is_rejected() {
        let Some(pool) = setup_test_db().await else { return };
        let admin = claims_for(&pool, "admin").await;
        let shopper = claims_for(&pool, "customer").await;

        let Json(created_product) = product::create_product(
            state_for(&pool),
            Extension(admin.clone()),
            Json(ProductForm {
                name: "Scarce Honey".to_string(),
                product_type: "honey".to_string(),
                unit: "jar".to_string(),
                price_per_unit: dec("80"),
                quantity_available: dec("2"),
                ..Default::default()
            }),
        )
        .await
        .expect("create_product failed");

        let result = sale::place_order(
            state_for(&pool),
            Extension(shopper),
            Json(OrderForm {
                product_id: Some(created_product.id),
                quantity: dec("10"),
                customer_name: "Carol Customer".to_string(),
                customer_phone: None,
            }),
        )
        .await;
        assert!(matches!(result, Err(AgriError::Validation(_))));

        let _ = product::delete_product(
            state_for(&pool),
            Extension(admin),
            Json(IdPayload {
                id: created_product.id,
            }),
        )
        .await;
    }

    #[tokio::test]
    async fn test_login_demo_accounts() {
        let Some(pool) = setup_test_db().await else { return };

        let Json(response) = auth::login(
            state_for(&pool),
            Json(auth::LoginRequest {
                username: "admin".to_string(),
                password: "admin123".to_string(),
            }),
        )
        .await
        .expect("login errored");
        assert!(response.success);
        assert!(response.token.is_some());
        assert_eq!(response.user.as_ref().map(|u| u.role.as_str()), Some("admin"));

        let Json(rejected) = auth::login(
            state_for(&pool),
            Json(auth::LoginRequest {
                username: "admin".to_string(),
                password: "wrong-password".to_string(),
            }),
        )
        .await
        .expect("login errored");
        assert!(!rejected.success);
        assert!(rejected.token.is_none());

        let Json(unknown) = auth::login(
            state_for(&pool),
            Json(auth::LoginRequest {
                username: "nobody".to_string(),
                password: "whatever".to_string(),
            }),
        )
        .await
        .expect("login errored");
        assert!(!unknown.success);
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let Some(pool) = setup_test_db().await else { return };

        let first = serde_json::to_value(field::fetch_fields(&pool).await.unwrap()).unwrap();
        let second = serde_json::to_value(field::fetch_fields(&pool).await.unwrap()).unwrap();
        assert_eq!(first, second);

        let crops_first = serde_json::to_value(crate::commands::crop::fetch_crops(&pool).await.unwrap()).unwrap();
        let crops_second = serde_json::to_value(crate::commands::crop::fetch_crops(&pool).await.unwrap()).unwrap();
        assert_eq!(crops_first, crops_second);
    }

    #[tokio::test]
    async fn test_staff_is_restricted_from_customers_view() {
        let Some(pool) = setup_test_db().await else { return };
        let staff = claims_for(&pool, "staff").await;

        let result = view::resolve_view(
            state_for(&pool),
            Extension(staff.clone()),
            Path("customers".to_string()),
        )
        .await;
        assert!(matches!(result, Err(AgriError::Forbidden(_))));

        let result = view::resolve_view(state_for(&pool), Extension(staff), Path("reports".to_string())).await;
        assert!(matches!(result, Err(AgriError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_unknown_view_falls_back_to_dashboard() {
        let Some(pool) = setup_test_db().await else { return };
        let admin = claims_for(&pool, "admin").await;

        let Json(payload) = view::resolve_view(
            state_for(&pool),
            Extension(admin),
            Path("no-such-view".to_string()),
        )
        .await
        .expect("fallback view errored");
        assert_eq!(payload["view"], "dashboard");
    }
}
