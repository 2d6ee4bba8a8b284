use std::str::FromStr;

use anyhow::anyhow;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

/// Roles ordered by privilege level
#[derive(DbEnum, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[ExistingTypePath = "crate::schema::sql_types::UserRole"]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    User,
    Manager,
    Admin,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Dashboard,
    View,
    Indicator,
    Backtest,
    Strategy,
    Portfolio,
    Settings,
    UserManage,
    Credentials,
}

const VIEWER: &[Permission] = &[Permission::Dashboard, Permission::View];

const USER: &[Permission] = &[
    Permission::Dashboard,
    Permission::View,
    Permission::Indicator,
    Permission::Backtest,
    Permission::Strategy,
    Permission::Portfolio,
];

const MANAGER: &[Permission] = &[
    Permission::Dashboard,
    Permission::View,
    Permission::Indicator,
    Permission::Backtest,
    Permission::Strategy,
    Permission::Portfolio,
    Permission::Settings,
];

const ADMIN: &[Permission] = &[
    Permission::Dashboard,
    Permission::View,
    Permission::Indicator,
    Permission::Backtest,
    Permission::Strategy,
    Permission::Portfolio,
    Permission::Settings,
    Permission::UserManage,
    Permission::Credentials,
];

impl Role {
    pub const ALL: [Role; 4] = [Role::Viewer, Role::User, Role::Manager, Role::Admin];

    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::Viewer => VIEWER,
            Role::User => USER,
            Role::Manager => MANAGER,
            Role::Admin => ADMIN,
        }
    }

    pub fn allows(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::User => "user",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    /// Display name, e.g. "Admin"
    pub fn name(&self) -> &'static str {
        match self {
            Role::Viewer => "Viewer",
            Role::User => "User",
            Role::Manager => "Manager",
            Role::Admin => "Admin",
        }
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewer" => Ok(Role::Viewer),
            "user" => Ok(Role::User),
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            _ => Err(anyhow!("Unknown role: {}", s)),
        }
    }
}

/// Permission list for a role name; unknown roles get viewer permissions.
pub fn permissions_for(role: &str) -> &'static [Permission] {
    role.parse::<Role>()
        .map(|r| r.permissions())
        .unwrap_or(VIEWER)
}
