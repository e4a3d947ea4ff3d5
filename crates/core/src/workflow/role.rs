//! Roles and the role → approval level mapping.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// User role in the approval hierarchy.
///
/// The discriminant is the approval level: a role of level `N` produces the
/// `N`-th approval of an expense. `Employee` carries no approval authority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Submits expenses.
    Employee = 0,
    /// First approval stage.
    Manager = 1,
    /// Second approval stage.
    Accountant = 2,
    /// Final approval stage; also manages users and views analytics.
    Admin = 3,
}

/// Set of roles held by one user.
pub type RoleSet = BTreeSet<Role>;

/// Level an expense reaches once every stage has approved it.
pub const FINAL_APPROVAL_LEVEL: u8 = Role::Admin.level();

impl Role {
    /// Every role, lowest level first.
    pub const ALL: [Self; 4] = [Self::Employee, Self::Manager, Self::Accountant, Self::Admin];

    /// Returns the approval level of the role.
    #[must_use]
    pub const fn level(self) -> u8 {
        self as u8
    }

    /// Returns true if the role can take part in the approval chain.
    #[must_use]
    pub const fn is_approver(self) -> bool {
        self.level() > 0
    }

    /// Returns the role that approves at the given level.
    #[must_use]
    pub fn for_level(level: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.level() == level)
    }

    /// Parses a role from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "EMPLOYEE" => Some(Self::Employee),
            "MANAGER" => Some(Self::Manager),
            "ACCOUNTANT" => Some(Self::Accountant),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns the wire representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "EMPLOYEE",
            Self::Manager => "MANAGER",
            Self::Accountant => "ACCOUNTANT",
            Self::Admin => "ADMIN",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::Manager => "Manager",
            Self::Accountant => "Accountant",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Highest approval level among `roles`; 0 when none of them can approve.
#[must_use]
pub fn level_of<'a>(roles: impl IntoIterator<Item = &'a Role>) -> u8 {
    roles.into_iter().map(|r| r.level()).max().unwrap_or(0)
}

/// Highest-level approver role among `roles`, if any.
#[must_use]
pub fn approver_role<'a>(roles: impl IntoIterator<Item = &'a Role>) -> Option<Role> {
    roles.into_iter().copied().filter(|r| r.is_approver()).max()
}

/// Parses a list of role names into a set.
///
/// Returns the first unknown name as the error.
pub fn parse_roles<S: AsRef<str>>(names: &[S]) -> Result<RoleSet, String> {
    names
        .iter()
        .map(|name| Role::parse(name.as_ref()).ok_or_else(|| name.as_ref().to_string()))
        .collect()
}
