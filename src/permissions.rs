use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::{AgriError, AgriResult};
use crate::middleware::auth::Claims;

/// The sole authorization axis. Every capability check goes through
/// `can_view` / `can_modify` rather than ad-hoc role string comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Staff,
    Customer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ViewId {
    Dashboard,
    Fields,
    Crops,
    Livestock,
    Inputs,
    Products,
    Harvests,
    Sales,
    Tasks,
    Reports,
    Customers,
    Marketplace,
    MyOrders,
}

/// Navigation declaration order.
pub const ALL_VIEWS: &[ViewId] = &[
    ViewId::Dashboard,
    ViewId::Fields,
    ViewId::Crops,
    ViewId::Livestock,
    ViewId::Inputs,
    ViewId::Products,
    ViewId::Harvests,
    ViewId::Sales,
    ViewId::Tasks,
    ViewId::Reports,
    ViewId::Customers,
    ViewId::Marketplace,
    ViewId::MyOrders,
];

impl ViewId {
    pub fn label(&self) -> &'static str {
        match self {
            ViewId::Dashboard => "Dashboard",
            ViewId::Fields => "Fields",
            ViewId::Crops => "Crops",
            ViewId::Livestock => "Livestock",
            ViewId::Inputs => "Inputs",
            ViewId::Products => "Products",
            ViewId::Harvests => "Harvests",
            ViewId::Sales => "Sales",
            ViewId::Tasks => "Tasks",
            ViewId::Reports => "Reports",
            ViewId::Customers => "Customers",
            ViewId::Marketplace => "Marketplace",
            ViewId::MyOrders => "My Orders",
        }
    }
}

pub fn can_view(role: Role, view: ViewId) -> bool {
    use ViewId::*;
    match view {
        Dashboard => true,
        Fields | Crops | Livestock | Inputs | Products | Harvests | Sales | Tasks => {
            matches!(role, Role::Admin | Role::Manager | Role::Staff)
        }
        Reports | Customers => matches!(role, Role::Admin | Role::Manager),
        Marketplace | MyOrders => role == Role::Customer,
    }
}

pub fn can_modify(role: Role, view: ViewId) -> bool {
    use ViewId::*;
    match view {
        Dashboard | Reports | MyOrders => false,
        Fields | Customers | Tasks => matches!(role, Role::Admin | Role::Manager),
        Crops | Livestock | Inputs | Products | Harvests | Sales => {
            matches!(role, Role::Admin | Role::Manager | Role::Staff)
        }
        Marketplace => role == Role::Customer,
    }
}

pub fn nav_items(role: Role) -> Vec<ViewId> {
    ALL_VIEWS
        .iter()
        .copied()
        .filter(|view| can_view(role, *view))
        .collect()
}

pub fn require_view(claims: &Claims, view: ViewId) -> AgriResult<()> {
    if can_view(claims.role(), view) {
        Ok(())
    } else {
        Err(AgriError::Forbidden(format!(
            "You don't have permission to view {}.",
            view.label().to_lowercase()
        )))
    }
}

pub fn require_modify(claims: &Claims, view: ViewId) -> AgriResult<()> {
    if can_modify(claims.role(), view) {
        Ok(())
    } else {
        Err(AgriError::Forbidden(format!(
            "You don't have permission to modify {}.",
            view.label().to_lowercase()
        )))
    }
}
