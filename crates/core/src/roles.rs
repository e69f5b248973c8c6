//! Actor roles.
//!
//! The original system stored the role as a free-form string and mixed
//! exact comparisons with `startsWith("department_")` prefix checks. Here
//! the role is a closed sum type so every authorization decision is an
//! exhaustive match, and a department role carries its department by
//! construction.

use std::fmt;
use std::str::FromStr;

use crate::department::Department;
use crate::error::CoreError;
use crate::types::DbId;

/// Role slug for citizen accounts.
pub const ROLE_PUBLIC: &str = "public";
/// Role slug for administrators.
pub const ROLE_ADMIN: &str = "admin";

/// An actor's role. Department roles are bound to exactly one department.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Public,
    Admin,
    Department(Department),
}

impl Role {
    /// Wire slug as stored in `users.role` and JWT claims
    /// (`"public"`, `"admin"`, `"pwd"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Public => ROLE_PUBLIC,
            Role::Admin => ROLE_ADMIN,
            Role::Department(d) => d.role_slug(),
        }
    }

    pub fn is_public(self) -> bool {
        matches!(self, Role::Public)
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// The department this role is affiliated with, if any. `public` and
    /// `admin` never carry an affiliation.
    pub fn department(self) -> Option<Department> {
        match self {
            Role::Department(d) => Some(d),
            _ => None,
        }
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_PUBLIC => Ok(Role::Public),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Department::from_role_slug(other)
                .map(Role::Department)
                .ok_or_else(|| CoreError::Validation(format!("Invalid role '{other}'"))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated identity performing a request. Role and id are
/// immutable for the lifetime of the request.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: DbId,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_slug_round_trip() {
        for slug in ["public", "admin", "electrical", "pwd", "municipal", "water", "sanitation"] {
            let role: Role = slug.parse().expect("known slug must parse");
            assert_eq!(role.as_str(), slug);
        }
    }

    #[test]
    fn unknown_role_fails() {
        assert!("department_pwd".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn department_affiliation() {
        let role: Role = "water".parse().unwrap();
        assert_eq!(role.department(), Some(Department::Water));

        assert_eq!(Role::Public.department(), None);
        assert_eq!(Role::Admin.department(), None);
    }
}
