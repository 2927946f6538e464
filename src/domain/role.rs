//! Account roles and pharmacy staff roles.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{ROLE_ADMIN, ROLE_PHARMACY, ROLE_USER, STAFF_ROLE_ADMIN, STAFF_ROLE_STAFF};
use crate::errors::AppError;

/// Platform-wide account role. A user holds a set of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Pharmacy,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => ROLE_USER,
            Role::Pharmacy => ROLE_PHARMACY,
            Role::Admin => ROLE_ADMIN,
        }
    }
}

impl std::str::FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Tolerate the "ROLE_" prefix used by older tokens
        let name = s.trim().trim_start_matches("ROLE_");
        match name.to_ascii_uppercase().as_str() {
            ROLE_USER => Ok(Role::User),
            ROLE_PHARMACY => Ok(Role::Pharmacy),
            ROLE_ADMIN => Ok(Role::Admin),
            _ => Err(AppError::validation(format!("Unknown role: {}", s))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a user inside a single pharmacy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum StaffRole {
    Admin,
    Staff,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Admin => STAFF_ROLE_ADMIN,
            StaffRole::Staff => STAFF_ROLE_STAFF,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, StaffRole::Admin)
    }
}

impl std::str::FromStr for StaffRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            STAFF_ROLE_ADMIN => Ok(StaffRole::Admin),
            STAFF_ROLE_STAFF => Ok(StaffRole::Staff),
            _ => Err(AppError::validation(format!("Unknown staff role: {}", s))),
        }
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_accepts_prefix_and_case() {
        assert_eq!("ROLE_PHARMACY".parse::<Role>().unwrap(), Role::Pharmacy);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("USER".parse::<Role>().unwrap(), Role::User);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_staff_role_round_trip_through_str() {
        for role in [StaffRole::Admin, StaffRole::Staff] {
            assert_eq!(role.as_str().parse::<StaffRole>().unwrap(), role);
        }
        assert!(StaffRole::Admin.is_admin());
        assert!(!StaffRole::Staff.is_admin());
    }
}
