//! Role / action capability matrix
//!
//! Authorization is a single function of (role, action). Routers attach a
//! `require_action` layer instead of scattering role-name literals.

use serde::{Deserialize, Serialize};

/// User roles, stored as lowercase text in the users table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Cashier,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "manager" => Some(Role::Manager),
            "cashier" => Some(Role::Cashier),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Cashier => "cashier",
        }
    }

    /// Capability check. Admin is allowed everything.
    pub fn allows(&self, action: Action) -> bool {
        use Action::*;
        match self {
            Role::Admin => true,
            Role::Manager => !matches!(action, ManageUsers | Backup),
            Role::Cashier => matches!(
                action,
                ViewInventory | ViewSales | CreateSale | ReturnSale | ManageClients
            ),
        }
    }
}

/// Every operation the API guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ManageUsers,
    ManageClients,
    ManageSuppliers,
    ManageInventory,
    ViewInventory,
    CreateSale,
    DeleteSale,
    ReturnSale,
    ViewSales,
    ViewReports,
    ManageSettings,
    ManageBranches,
    ManageCoupons,
    Backup,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_allows_everything() {
        for action in [
            Action::ManageUsers,
            Action::Backup,
            Action::DeleteSale,
            Action::ManageSettings,
        ] {
            assert!(Role::Admin.allows(action));
        }
    }

    #[test]
    fn test_manager_cannot_touch_users_or_backups() {
        assert!(!Role::Manager.allows(Action::ManageUsers));
        assert!(!Role::Manager.allows(Action::Backup));
        assert!(Role::Manager.allows(Action::ManageInventory));
        assert!(Role::Manager.allows(Action::DeleteSale));
        assert!(Role::Manager.allows(Action::ViewReports));
    }

    #[test]
    fn test_cashier_is_pos_only() {
        assert!(Role::Cashier.allows(Action::CreateSale));
        assert!(Role::Cashier.allows(Action::ViewInventory));
        assert!(Role::Cashier.allows(Action::ManageClients));
        assert!(!Role::Cashier.allows(Action::DeleteSale));
        assert!(!Role::Cashier.allows(Action::ManageInventory));
        assert!(!Role::Cashier.allows(Action::ViewReports));
        assert!(!Role::Cashier.allows(Action::ManageSettings));
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Manager, Role::Cashier] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("root"), None);
    }
}
