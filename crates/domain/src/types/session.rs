//! Roles, modules and the signed-in session

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Application module a role can open, labelled by its route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Admin,
    Crm,
    Prepress,
    Press,
    Postpress,
    Inventory,
}

impl_domain_status_conversions!(Module {
    Admin => "admin",
    Crm => "crm",
    Prepress => "preprensa",
    Press => "prensa",
    Postpress => "postprensa",
    Inventory => "inventario",
});

/// Staff role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Sales,
    Designer,
    PressOperator,
    PostPressOperator,
    Warehouse,
}

impl_domain_status_conversions!(Role {
    Admin => "admin",
    Sales => "sales",
    Designer => "designer",
    PressOperator => "press_operator",
    PostPressOperator => "post_press_operator",
    Warehouse => "warehouse",
});

impl Role {
    /// Label shown in the staff directory
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Admin => "Admin (Gerente)",
            Self::Sales => "Vendedor (CRM)",
            Self::Designer => "Diseñador (Pre-Prensa)",
            Self::PressOperator => "Operador (Prensa)",
            Self::PostPressOperator => "Operador (Post-Prensa)",
            Self::Warehouse => "Almacén (Inventario)",
        }
    }

    /// Parse either a storage label or a directory label
    pub fn from_display_name(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|role| role.display_name() == trimmed)
            .or_else(|| trimmed.parse().ok())
    }

    /// Module a role lands on after signing in
    pub const fn home_module(self) -> Module {
        match self {
            Self::Admin => Module::Admin,
            Self::Sales => Module::Crm,
            Self::Designer => Module::Prepress,
            Self::PressOperator => Module::Press,
            Self::PostPressOperator => Module::Postpress,
            Self::Warehouse => Module::Inventory,
        }
    }

    /// Admins open every module; everyone else only their own
    pub fn can_access(self, module: Module) -> bool {
        matches!(self, Self::Admin) || self.home_module() == module
    }
}

/// Persisted session of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub token: String,
}

impl Session {
    pub fn actor(&self) -> Actor {
        Actor { id: self.id.clone(), email: self.email.clone() }
    }
}

/// Identity attached to workflow writes and audit rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub email: String,
}
