#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::commands::crop::CropForm;
    use crate::commands::customer::CustomerForm;
    use crate::commands::field::FieldForm;
    use crate::commands::input::InputForm;
    use crate::commands::livestock::LivestockForm;
    use crate::commands::product::ProductForm;
    use crate::commands::sale::SaleForm;
    use crate::commands::view::{field_summary, my_orders, sales_summary, task_summary};
    use crate::db::{Field, Sale, Task};
    use crate::middleware::auth::Claims;
    use crate::permissions::{can_modify, can_view, nav_items, require_view, Role, ViewId};
    use crate::validation::{
        validate_crop, validate_customer, validate_field, validate_input, validate_livestock,
        validate_product, validate_sale,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn claims_with_role(role: &str) -> Claims {
        Claims {
            sub: "test".to_string(),
            user_id: Uuid::new_v4(),
            username: role.to_string(),
            role: role.to_string(),
            full_name: format!("{} user", role),
            phone: None,
            exp: 0,
        }
    }

    fn valid_field_form() -> FieldForm {
        FieldForm {
            id: None,
            name: "North Field".to_string(),
            size: dec("12.5"),
            location: "Plot 9".to_string(),
            soil_type: "loam".to_string(),
            irrigation_system: None,
            status: None,
        }
    }

    #[test]
    fn test_field_validation_requires_all_fields() {
        let form = FieldForm::default();
        let errors = validate_field(&form);
        assert_eq!(errors.get("name"), Some("Field name is required"));
        assert_eq!(errors.get("size"), Some("Field size must be greater than 0"));
        assert_eq!(errors.get("location"), Some("Location is required"));
        assert_eq!(errors.get("soil_type"), Some("Soil type is required"));
    }

    #[test]
    fn test_field_validation_accepts_complete_form() {
        let errors = validate_field(&valid_field_form());
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn test_negative_numeric_inputs_are_rejected() {
        let mut field = valid_field_form();
        field.size = dec("-1");
        assert!(!validate_field(&field).is_empty());

        let input = InputForm {
            name: "Urea".to_string(),
            input_type: "fertilizer".to_string(),
            supplier: "AgroSupplies".to_string(),
            quantity_in_stock: dec("-5"),
            unit: "kg".to_string(),
            cost_per_unit: dec("-2"),
            reorder_level: dec("-1"),
            ..Default::default()
        };
        let errors = validate_input(&input);
        assert_eq!(errors.get("quantity_in_stock"), Some("Quantity must be 0 or greater"));
        assert_eq!(errors.get("cost_per_unit"), Some("Cost per unit must be 0 or greater"));
        assert_eq!(errors.get("reorder_level"), Some("Reorder level must be 0 or greater"));

        let mut product = ProductForm {
            name: "Tomatoes".to_string(),
            product_type: "vegetable".to_string(),
            unit: "crate".to_string(),
            price_per_unit: dec("25"),
            quantity_available: dec("-3"),
            ..Default::default()
        };
        assert_eq!(
            validate_product(&product).get("quantity_available"),
            Some("Quantity must be 0 or greater")
        );
        product.quantity_available = dec("0");
        assert!(validate_product(&product).is_empty());
    }

    #[test]
    fn test_product_price_must_be_positive() {
        let product = ProductForm {
            name: "Eggs".to_string(),
            product_type: "poultry".to_string(),
            unit: "tray".to_string(),
            price_per_unit: dec("0"),
            ..Default::default()
        };
        assert_eq!(
            validate_product(&product).get("price_per_unit"),
            Some("Price per unit must be greater than 0")
        );
    }

    #[test]
    fn test_crop_dates_must_be_ordered() {
        let mut form = CropForm {
            name: "Maize".to_string(),
            variety: "SC719".to_string(),
            planting_date: Some(date(2024, 6, 1)),
            expected_harvest_date: Some(date(2024, 5, 1)),
            area: dec("3.5"),
            ..Default::default()
        };
        assert_eq!(
            validate_crop(&form).get("expected_harvest_date"),
            Some("Harvest date must be after planting date")
        );

        // Equal dates are also rejected.
        form.expected_harvest_date = Some(date(2024, 6, 1));
        assert!(!validate_crop(&form).is_empty());

        form.expected_harvest_date = Some(date(2024, 10, 1));
        assert!(validate_crop(&form).is_empty());
    }

    #[test]
    fn test_crop_requires_both_dates() {
        let form = CropForm {
            name: "Beans".to_string(),
            variety: "Kabulangeti".to_string(),
            area: dec("1"),
            ..Default::default()
        };
        let errors = validate_crop(&form);
        assert_eq!(errors.get("planting_date"), Some("Planting date is required"));
        assert_eq!(errors.get("expected_harvest_date"), Some("Expected harvest date is required"));
    }

    #[test]
    fn test_livestock_weight_only_validated_when_present() {
        let mut form = LivestockForm {
            animal_type: "cattle".to_string(),
            breed: "Boran".to_string(),
            tag: "ZM-001".to_string(),
            gender: "female".to_string(),
            weight: None,
            ..Default::default()
        };
        assert!(validate_livestock(&form).is_empty());

        form.weight = Some(dec("0"));
        assert_eq!(
            validate_livestock(&form).get("weight"),
            Some("Weight must be greater than 0")
        );

        form.weight = Some(dec("320.5"));
        assert!(validate_livestock(&form).is_empty());
    }

    #[test]
    fn test_livestock_vocabulary_is_enforced() {
        let form = LivestockForm {
            animal_type: "dragons".to_string(),
            breed: "Unknown".to_string(),
            tag: "ZM-002".to_string(),
            gender: "female".to_string(),
            ..Default::default()
        };
        assert!(validate_livestock(&form).get("animal_type").is_some());
    }

    #[test]
    fn test_customer_email_format() {
        let mut form = CustomerForm {
            name: "Chanda Mwale".to_string(),
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert_eq!(
            validate_customer(&form).get("email"),
            Some("Please enter a valid email address")
        );

        form.email = Some("chanda@example.com".to_string());
        assert!(validate_customer(&form).is_empty());

        form.email = None;
        assert!(validate_customer(&form).is_empty());
    }

    #[test]
    fn test_sale_payment_method_vocabulary() {
        let mut form = SaleForm {
            customer_name: "Walk-in".to_string(),
            quantity: dec("2"),
            price_per_unit: dec("50"),
            total_amount: dec("100"),
            sale_date: Some(date(2024, 7, 1)),
            payment_method: Some("pending".to_string()),
            ..Default::default()
        };
        // Marketplace orders record "pending" before payment details exist.
        assert!(validate_sale(&form).is_empty());

        form.payment_method = Some("bitcoin".to_string());
        assert!(validate_sale(&form).get("payment_method").is_some());
    }

    #[test]
    fn test_customer_navigation_set() {
        let views = nav_items(Role::Customer);
        assert_eq!(views, vec![ViewId::Dashboard, ViewId::Marketplace, ViewId::MyOrders]);
        for view in [
            ViewId::Fields,
            ViewId::Crops,
            ViewId::Livestock,
            ViewId::Inputs,
            ViewId::Tasks,
            ViewId::Reports,
            ViewId::Customers,
        ] {
            assert!(!views.contains(&view), "{:?} must not be reachable", view);
        }
    }

    #[test]
    fn test_staff_cannot_reach_customers_or_reports() {
        let staff = claims_with_role("staff");
        assert!(require_view(&staff, ViewId::Customers).is_err());
        assert!(require_view(&staff, ViewId::Reports).is_err());
        assert!(require_view(&staff, ViewId::Sales).is_ok());
    }

    #[test]
    fn test_modify_matrix() {
        // Fields are managed by admin and manager only.
        assert!(can_modify(Role::Admin, ViewId::Fields));
        assert!(can_modify(Role::Manager, ViewId::Fields));
        assert!(!can_modify(Role::Staff, ViewId::Fields));
        // Day-to-day records are open to staff as well.
        assert!(can_modify(Role::Staff, ViewId::Crops));
        assert!(can_modify(Role::Staff, ViewId::Harvests));
        // Customers never touch farm records, only marketplace orders.
        assert!(!can_modify(Role::Customer, ViewId::Sales));
        assert!(can_modify(Role::Customer, ViewId::Marketplace));
        assert!(!can_view(Role::Admin, ViewId::Marketplace));
    }

    #[test]
    fn test_unknown_role_falls_back_to_least_privilege() {
        let claims = claims_with_role("superuser");
        assert_eq!(claims.role(), Role::Customer);
    }

    #[test]
    fn test_view_id_round_trip() {
        assert_eq!("my-orders".parse::<ViewId>().unwrap(), ViewId::MyOrders);
        assert_eq!(ViewId::MyOrders.to_string(), "my-orders");
        assert!("settings".parse::<ViewId>().is_err());
    }

    fn sample_field(name: &str, size: &str, status: &str, irrigation: Option<&str>) -> Field {
        Field {
            id: Uuid::new_v4(),
            name: name.to_string(),
            size: dec(size),
            location: "Plot".to_string(),
            soil_type: "loam".to_string(),
            irrigation_system: irrigation.map(|s| s.to_string()),
            status: status.to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_field_summary_counts() {
        let fields = vec![
            sample_field("North", "12.5", "active", Some("drip")),
            sample_field("South", "7.5", "resting", None),
            sample_field("East", "5", "active", Some("")),
        ];
        let summary = field_summary(&fields);
        assert_eq!(summary["total"], 3);
        assert_eq!(summary["active"], 2);
        assert_eq!(summary["irrigated"], 1);
        assert_eq!(summary["total_acreage"].as_f64().unwrap(), 25.0);
    }

    fn sample_sale(name: &str, phone: Option<&str>, amount: &str, day: NaiveDate) -> Sale {
        Sale {
            id: Uuid::new_v4(),
            product_id: None,
            customer_id: None,
            customer_name: name.to_string(),
            customer_phone: phone.map(|p| p.to_string()),
            quantity: dec("1"),
            price_per_unit: dec(amount),
            total_amount: dec(amount),
            sale_date: day,
            payment_method: "cash".to_string(),
            payment_status: "paid".to_string(),
            delivery_status: "pending".to_string(),
            notes: None,
            created_at: None,
            updated_at: None,
            product_name: None,
            product_unit: None,
        }
    }

    #[test]
    fn test_sales_summary_recent_window() {
        let today = date(2024, 7, 15);
        let sales = vec![
            sample_sale("A", None, "100", date(2024, 7, 14)),
            sample_sale("B", None, "250", date(2024, 7, 10)),
            sample_sale("C", None, "400", date(2024, 5, 1)),
        ];
        let summary = sales_summary(&sales, today);
        assert_eq!(summary["total"], 3);
        assert_eq!(summary["total_revenue"].as_f64().unwrap(), 750.0);
        assert_eq!(summary["recent_count"], 2);
        assert_eq!(summary["recent_revenue"].as_f64().unwrap(), 350.0);
        assert_eq!(summary["paid"], 3);
        assert_eq!(summary["by_payment_method"]["cash"], 3);
    }

    #[test]
    fn test_my_orders_match_by_name_or_phone() {
        let mut claims = claims_with_role("customer");
        claims.full_name = "Carol Customer".to_string();
        claims.phone = Some("0977-000-111".to_string());

        let sales = vec![
            sample_sale("Carol Customer", None, "100", date(2024, 7, 1)),
            sample_sale("Somebody Else", Some("0977-000-111"), "50", date(2024, 7, 2)),
            sample_sale("Somebody Else", Some("0966-222-333"), "75", date(2024, 7, 3)),
        ];
        let mine = my_orders(sales, &claims);
        assert_eq!(mine.len(), 2);
    }

    fn sample_task(status: &str, due: NaiveDate) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "Weed block A".to_string(),
            description: String::new(),
            assigned_to: None,
            assigned_by: None,
            priority: "medium".to_string(),
            status: status.to_string(),
            due_date: due,
            start_date: None,
            completed_date: None,
            field_id: None,
            crop_id: None,
            livestock_id: None,
            notes: None,
            created_at: None,
            updated_at: None,
            assigned_to_name: None,
            assigned_by_name: None,
        }
    }

    #[test]
    fn test_task_summary_overdue_excludes_finished() {
        let today = date(2024, 7, 15);
        let tasks = vec![
            sample_task("pending", date(2024, 7, 1)),
            sample_task("completed", date(2024, 7, 1)),
            sample_task("cancelled", date(2024, 7, 1)),
            sample_task("in-progress", date(2024, 8, 1)),
        ];
        let summary = task_summary(&tasks, today);
        assert_eq!(summary["overdue"], 1);
        assert_eq!(summary["pending"], 1);
        assert_eq!(summary["in_progress"], 1);
        assert_eq!(summary["completed"], 1);
    }
}
