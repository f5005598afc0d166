// models/src/roles.rs

use serde::{Deserialize, Serialize};

/// Administrative roles, ordered from widest to narrowest scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    HealthSystemAdmin,
    HospitalAdmin,
    DepartmentalAdmin,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[
            Role::SuperAdmin,
            Role::HealthSystemAdmin,
            Role::HospitalAdmin,
            Role::DepartmentalAdmin,
        ]
    }

    /// The scope field this role is keyed on; `None` for super_admin,
    /// which carries no scope at all.
    pub fn scope_field(&self) -> Option<ScopeField> {
        match self {
            Role::SuperAdmin => None,
            Role::HealthSystemAdmin => Some(ScopeField::HealthSystem),
            Role::HospitalAdmin => Some(ScopeField::Hospital),
            Role::DepartmentalAdmin => Some(ScopeField::Department),
        }
    }
}

/// The hierarchy level a role's scope foreign key points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeField {
    HealthSystem,
    Hospital,
    Department,
}

impl ScopeField {
    /// Document field name carrying this scope id on user records.
    pub fn field_name(&self) -> &'static str {
        match self {
            ScopeField::HealthSystem => "health_system_id",
            ScopeField::Hospital => "hospital_id",
            ScopeField::Department => "department_id",
        }
    }
}
