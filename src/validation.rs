use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::commands::crop::CropForm;
use crate::commands::customer::CustomerForm;
use crate::commands::field::FieldForm;
use crate::commands::harvest::HarvestForm;
use crate::commands::input::InputForm;
use crate::commands::livestock::LivestockForm;
use crate::commands::product::ProductForm;
use crate::commands::sale::{OrderForm, SaleForm};
use crate::commands::task::TaskForm;
use crate::error::{AgriError, AgriResult};

pub const FIELD_STATUSES: &[&str] = &["active", "resting", "maintenance"];
pub const CROP_STATUSES: &[&str] = &["planted", "growing", "flowering", "harvested"];
pub const LIVESTOCK_TYPES: &[&str] = &["cattle", "goats", "sheep", "pigs", "chickens", "other"];
pub const GENDERS: &[&str] = &["male", "female"];
pub const HEALTH_STATUSES: &[&str] = &["healthy", "sick", "quarantine", "deceased"];
pub const REPRODUCTION_STATUSES: &[&str] = &["pregnant", "lactating", "breeding", "none"];
pub const INPUT_TYPES: &[&str] = &["seed", "fertilizer", "pesticide", "herbicide", "equipment", "other"];
pub const PRODUCT_STATUSES: &[&str] = &["available", "sold", "reserved", "damaged"];
pub const HARVEST_QUALITIES: &[&str] = &["excellent", "good", "fair", "poor"];
pub const TASK_PRIORITIES: &[&str] = &["low", "medium", "high", "urgent"];
pub const TASK_STATUSES: &[&str] = &["pending", "in-progress", "completed", "cancelled"];
// "pending" is what marketplace orders record before payment details exist.
pub const PAYMENT_METHODS: &[&str] = &["cash", "mobile_money", "bank_transfer", "credit", "pending"];
pub const PAYMENT_STATUSES: &[&str] = &["paid", "pending", "partial", "overdue"];
pub const DELIVERY_STATUSES: &[&str] = &["pending", "delivered", "picked_up"];

/// Field name to message, in field-name order so responses are deterministic.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(|s| s.as_str())
    }

    pub fn into_result(self) -> AgriResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AgriError::Validation(self))
        }
    }

    fn require(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.add(field, message);
        }
    }

    fn positive(&mut self, field: &str, value: Decimal, message: &str) {
        if value <= Decimal::ZERO {
            self.add(field, message);
        }
    }

    fn non_negative(&mut self, field: &str, value: Decimal, message: &str) {
        if value < Decimal::ZERO {
            self.add(field, message);
        }
    }

    fn vocab(&mut self, field: &str, value: Option<&str>, allowed: &[&str], label: &str) {
        if let Some(value) = value {
            if !allowed.contains(&value) {
                self.add(field, format!("{} must be one of: {}", label, allowed.join(", ")));
            }
        }
    }
}

fn email_looks_valid(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

pub fn validate_field(form: &FieldForm) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.require("name", &form.name, "Field name is required");
    errors.positive("size", form.size, "Field size must be greater than 0");
    errors.require("location", &form.location, "Location is required");
    errors.require("soil_type", &form.soil_type, "Soil type is required");
    errors.vocab("status", form.status.as_deref(), FIELD_STATUSES, "Status");
    errors
}

pub fn validate_crop(form: &CropForm) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.require("name", &form.name, "Crop name is required");
    errors.require("variety", &form.variety, "Variety is required");
    if form.planting_date.is_none() {
        errors.add("planting_date", "Planting date is required");
    }
    if form.expected_harvest_date.is_none() {
        errors.add("expected_harvest_date", "Expected harvest date is required");
    }
    errors.positive("area", form.area, "Area must be greater than 0");
    if let (Some(planting), Some(harvest)) = (form.planting_date, form.expected_harvest_date) {
        if harvest <= planting {
            errors.add("expected_harvest_date", "Harvest date must be after planting date");
        }
    }
    errors.vocab("status", form.status.as_deref(), CROP_STATUSES, "Status");
    errors
}

pub fn validate_livestock(form: &LivestockForm) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.require("animal_type", &form.animal_type, "Animal type is required");
    if !form.animal_type.trim().is_empty() {
        errors.vocab("animal_type", Some(form.animal_type.as_str()), LIVESTOCK_TYPES, "Animal type");
    }
    errors.require("breed", &form.breed, "Breed is required");
    errors.require("tag", &form.tag, "Tag is required");
    errors.require("gender", &form.gender, "Gender is required");
    if !form.gender.trim().is_empty() {
        errors.vocab("gender", Some(form.gender.as_str()), GENDERS, "Gender");
    }
    if let Some(weight) = form.weight {
        if weight <= Decimal::ZERO {
            errors.add("weight", "Weight must be greater than 0");
        }
    }
    errors.vocab("health_status", form.health_status.as_deref(), HEALTH_STATUSES, "Health status");
    errors.vocab(
        "reproduction_status",
        form.reproduction_status.as_deref(),
        REPRODUCTION_STATUSES,
        "Reproduction status",
    );
    errors
}

pub fn validate_input(form: &InputForm) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.require("name", &form.name, "Input name is required");
    errors.require("input_type", &form.input_type, "Input type is required");
    if !form.input_type.trim().is_empty() {
        errors.vocab("input_type", Some(form.input_type.as_str()), INPUT_TYPES, "Input type");
    }
    errors.require("supplier", &form.supplier, "Supplier is required");
    errors.require("unit", &form.unit, "Unit is required");
    errors.non_negative("cost_per_unit", form.cost_per_unit, "Cost per unit must be 0 or greater");
    errors.non_negative("quantity_in_stock", form.quantity_in_stock, "Quantity must be 0 or greater");
    errors.non_negative("reorder_level", form.reorder_level, "Reorder level must be 0 or greater");
    errors
}

pub fn validate_product(form: &ProductForm) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.require("name", &form.name, "Product name is required");
    errors.require("product_type", &form.product_type, "Product type is required");
    errors.require("unit", &form.unit, "Unit is required");
    errors.positive("price_per_unit", form.price_per_unit, "Price per unit must be greater than 0");
    errors.non_negative("quantity_available", form.quantity_available, "Quantity must be 0 or greater");
    errors.vocab("status", form.status.as_deref(), PRODUCT_STATUSES, "Status");
    errors
}

pub fn validate_harvest(form: &HarvestForm) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if form.harvest_date.is_none() {
        errors.add("harvest_date", "Harvest date is required");
    }
    errors.positive("quantity", form.quantity, "Quantity must be greater than 0");
    errors.require("unit", &form.unit, "Unit is required");
    errors.require("storage_location", &form.storage_location, "Storage location is required");
    errors.vocab("quality", form.quality.as_deref(), HARVEST_QUALITIES, "Quality");
    errors
}

pub fn validate_customer(form: &CustomerForm) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.require("name", &form.name, "Customer name is required");
    if let Some(email) = form.email.as_deref() {
        if !email.is_empty() && !email_looks_valid(email) {
            errors.add("email", "Please enter a valid email address");
        }
    }
    errors
}

pub fn validate_task(form: &TaskForm) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.require("title", &form.title, "Task title is required");
    if form.assigned_to.is_none() {
        errors.add("assigned_to", "Assignee is required");
    }
    if form.due_date.is_none() {
        errors.add("due_date", "Due date is required");
    }
    errors.vocab("priority", form.priority.as_deref(), TASK_PRIORITIES, "Priority");
    errors.vocab("status", form.status.as_deref(), TASK_STATUSES, "Status");
    errors
}

pub fn validate_sale(form: &SaleForm) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.require("customer_name", &form.customer_name, "Customer name is required");
    errors.positive("quantity", form.quantity, "Quantity must be greater than 0");
    errors.non_negative("price_per_unit", form.price_per_unit, "Price per unit must be 0 or greater");
    errors.non_negative("total_amount", form.total_amount, "Total amount must be 0 or greater");
    if form.sale_date.is_none() {
        errors.add("sale_date", "Sale date is required");
    }
    errors.vocab("payment_method", form.payment_method.as_deref(), PAYMENT_METHODS, "Payment method");
    errors.vocab("payment_status", form.payment_status.as_deref(), PAYMENT_STATUSES, "Payment status");
    errors.vocab("delivery_status", form.delivery_status.as_deref(), DELIVERY_STATUSES, "Delivery status");
    errors
}

pub fn validate_order(form: &OrderForm) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if form.product_id.is_none() {
        errors.add("product_id", "Product is required");
    }
    errors.positive("quantity", form.quantity, "Quantity must be greater than 0");
    errors.require("customer_name", &form.customer_name, "Customer name is required");
    errors
}
