//! The closed role enumeration.
//!
//! Roles are disjoint capability classes. There is no hierarchy: a superadmin
//! is not "an admin plus more" as far as routing is concerned, each role has
//! exactly one dashboard area.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Lecturer,
    Admin,
    Superadmin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Student, Role::Lecturer, Role::Admin, Role::Superadmin];

    /// The URL segment under the protected prefix that belongs to this role.
    pub fn segment(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Lecturer => "lecturer",
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
        }
    }

    /// Parse a path segment. Exact match only.
    pub fn from_segment(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Role::Student),
            "lecturer" => Some(Role::Lecturer),
            "admin" => Some(Role::Admin),
            "superadmin" => Some(Role::Superadmin),
            _ => None,
        }
    }

    /// Parse a role value as stored in the document store.
    ///
    /// The dataset predates the canonical lowercase spelling, so "superAdmin"
    /// (the studio dropdown value) is accepted alongside "superadmin" (what
    /// the provisioning webhook writes). Anything else is not a role; callers
    /// must treat it as NotFound rather than pass the raw string along.
    pub fn from_store_value(s: &str) -> Option<Self> {
        match s {
            "superAdmin" => Some(Role::Superadmin),
            other => Self::from_segment(other),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.segment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_round_trips_for_every_role() {
        for role in Role::ALL {
            assert_eq!(Role::from_segment(role.segment()), Some(role));
        }
    }

    #[test]
    fn store_values_accept_legacy_superadmin_spelling() {
        assert_eq!(Role::from_store_value("superAdmin"), Some(Role::Superadmin));
        assert_eq!(Role::from_store_value("superadmin"), Some(Role::Superadmin));
        assert_eq!(Role::from_store_value("student"), Some(Role::Student));
    }

    #[test]
    fn unknown_values_are_rejected() {
        for bad in ["", "Student", "STUDENT", "staff", "admin ", "super-admin"] {
            assert_eq!(Role::from_store_value(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn segments_are_not_case_insensitive() {
        assert_eq!(Role::from_segment("superAdmin"), None);
        assert_eq!(Role::from_segment("Admin"), None);
    }
}
