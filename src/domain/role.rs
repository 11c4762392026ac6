//! Roles assigned to profiles and the capabilities they grant.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Role stored on a user's profile row.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    #[default]
    User,
}

/// Actions gated by role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Work inside the regular `/app` dashboard.
    UseDashboard,
    /// Work inside the `/admin` area.
    UseAdminArea,
    /// Read the joined auth/profile listing through the service-role client.
    ListAuthUsers,
    /// Change or remove another user's profile.
    ManageUsers,
}

impl Role {
    pub const OPTIONS: &'static [&'static str] = &["super_admin", "admin", "user"];

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Whether this role is granted the given capability.
    pub fn can(self, capability: Capability) -> bool {
        match capability {
            Capability::UseDashboard => matches!(self, Role::User),
            Capability::UseAdminArea | Capability::ListAuthUsers => {
                matches!(self, Role::Admin | Role::SuperAdmin)
            }
            Capability::ManageUsers => matches!(self, Role::SuperAdmin),
        }
    }

    /// Area a signed-in user lands on.
    pub fn home_area(self) -> Area {
        if self.can(Capability::UseAdminArea) {
            Area::Admin
        } else {
            Area::Dashboard
        }
    }

    pub fn home_path(self) -> &'static str {
        self.home_area().entry()
    }
}

/// Signed-in route trees; entity pages are mounted under both.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Area {
    Dashboard,
    Admin,
}

impl Area {
    pub const fn entry(self) -> &'static str {
        match self {
            Area::Dashboard => crate::DASHBOARD_ENTRY,
            Area::Admin => crate::ADMIN_ENTRY,
        }
    }

    /// Capability a user needs to work inside this area.
    pub const fn capability(self) -> Capability {
        match self {
            Area::Dashboard => Capability::UseDashboard,
            Area::Admin => Capability::UseAdminArea,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "super_admin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}
