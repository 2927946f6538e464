//! Pharmacy tenant and its staff roster.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{StaffRole, User};

/// Pharmacy domain entity
#[derive(Debug, Clone, PartialEq)]
pub struct Pharmacy {
    pub id: Uuid,
    pub name: String,
    pub registration_number: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: Option<String>,
    pub owner_id: Uuid,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pharmacy {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    pub fn apply(&mut self, update: PharmacyUpdate) {
        self.name = update.name;
        self.address = update.address;
        self.phone = update.phone;
        self.email = update.email;
        self.website = update.website;
        if let Some(active) = update.active {
            self.active = active;
        }
    }
}

/// Membership row linking a user to a pharmacy
#[derive(Debug, Clone, PartialEq)]
pub struct PharmacyStaff {
    pub id: Uuid,
    pub pharmacy_id: Uuid,
    pub user_id: Uuid,
    pub role: StaffRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PharmacyStaff {
    /// Active row for `user_id`, any role
    pub fn grants_membership(&self, user_id: Uuid) -> bool {
        self.active && self.user_id == user_id
    }

    /// Active ADMIN row for `user_id`
    pub fn grants_admin(&self, user_id: Uuid) -> bool {
        self.grants_membership(user_id) && self.role.is_admin()
    }
}

/// Fields for a new pharmacy. The owner is always supplied by the server.
#[derive(Debug, Clone)]
pub struct NewPharmacy {
    pub name: String,
    pub registration_number: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: Option<String>,
    pub owner_id: Uuid,
}

/// Body of `POST /api/pharmacies`. The caller becomes the owner.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePharmacy {
    #[validate(length(min = 1, message = "Pharmacy name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Registration number is required"))]
    #[schema(example = "RX-100")]
    pub registration_number: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub website: Option<String>,
}

impl CreatePharmacy {
    pub fn with_owner(self, owner_id: Uuid) -> NewPharmacy {
        NewPharmacy {
            name: self.name,
            registration_number: self.registration_number,
            address: self.address,
            phone: self.phone,
            email: self.email,
            website: self.website,
            owner_id,
        }
    }
}

/// Editable pharmacy fields. The registration number is immutable.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyUpdate {
    #[validate(length(min = 1, message = "Pharmacy name is required"))]
    pub name: String,
    pub address: String,
    pub phone: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub website: Option<String>,
    /// Left unchanged when absent
    pub active: Option<bool>,
}

/// Body of `POST /api/pharmacies/{id}/staff`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddStaff {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "clerk@example.com")]
    pub email: String,
    /// Defaults to STAFF
    pub role: Option<StaffRole>,
}

/// Editable staff fields
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffUpdate {
    pub role: Option<StaffRole>,
    pub active: Option<bool>,
}

impl PharmacyStaff {
    pub fn apply(&mut self, update: &StaffUpdate) {
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(active) = update.active {
            self.active = active;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyResponse {
    pub id: Uuid,
    #[schema(example = "Corner Pharmacy")]
    pub name: String,
    #[schema(example = "RX-100")]
    pub registration_number: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: Option<String>,
    pub active: bool,
    pub owner_id: Uuid,
    pub owner_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PharmacyResponse {
    pub fn new(pharmacy: Pharmacy, owner: Option<&User>) -> Self {
        Self {
            id: pharmacy.id,
            name: pharmacy.name,
            registration_number: pharmacy.registration_number,
            address: pharmacy.address,
            phone: pharmacy.phone,
            email: pharmacy.email,
            website: pharmacy.website,
            active: pharmacy.active,
            owner_id: pharmacy.owner_id,
            owner_name: owner.map(User::full_name),
            created_at: pharmacy.created_at,
            updated_at: pharmacy.updated_at,
        }
    }
}

/// Staff row enriched with the user's identity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffResponse {
    pub id: Uuid,
    pub pharmacy_id: Uuid,
    pub user_id: Uuid,
    pub role: StaffRole,
    pub active: bool,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StaffResponse {
    pub fn new(staff: PharmacyStaff, user: &User) -> Self {
        Self {
            id: staff.id,
            pharmacy_id: staff.pharmacy_id,
            user_id: staff.user_id,
            role: staff.role,
            active: staff.active,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            created_at: staff.created_at,
            updated_at: staff.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff(user_id: Uuid, role: StaffRole, active: bool) -> PharmacyStaff {
        PharmacyStaff {
            id: Uuid::new_v4(),
            pharmacy_id: Uuid::new_v4(),
            user_id,
            role,
            active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn pharmacy(active: bool) -> Pharmacy {
        Pharmacy {
            id: Uuid::new_v4(),
            name: "Corner Pharmacy".to_string(),
            registration_number: "RX-100".to_string(),
            address: "1 Main St".to_string(),
            phone: "555-0100".to_string(),
            email: "corner@example.com".to_string(),
            website: None,
            owner_id: Uuid::new_v4(),
            active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn rename(active: Option<bool>) -> PharmacyUpdate {
        PharmacyUpdate {
            name: "Corner Pharmacy East".to_string(),
            address: "2 Main St".to_string(),
            phone: "555-0101".to_string(),
            email: "east@example.com".to_string(),
            website: None,
            active,
        }
    }

    #[test]
    fn test_update_without_active_keeps_deactivated_pharmacy_closed() {
        let mut closed = pharmacy(false);
        closed.apply(rename(None));
        assert_eq!(closed.name, "Corner Pharmacy East");
        assert!(!closed.active);
    }

    #[test]
    fn test_update_with_active_flag_reopens() {
        let mut closed = pharmacy(false);
        closed.apply(rename(Some(true)));
        assert!(closed.active);
        assert_eq!(closed.registration_number, "RX-100");
    }

    #[test]
    fn test_inactive_row_grants_nothing() {
        let user = Uuid::new_v4();
        let row = staff(user, StaffRole::Admin, false);
        assert!(!row.grants_membership(user));
        assert!(!row.grants_admin(user));
    }

    #[test]
    fn test_staff_update_only_touches_given_fields() {
        let user = Uuid::new_v4();
        let mut row = staff(user, StaffRole::Staff, true);
        row.apply(&StaffUpdate {
            role: None,
            active: Some(false),
        });
        assert_eq!(row.role, StaffRole::Staff);
        assert!(!row.active);
        assert!(!row.grants_membership(user));
    }

    #[test]
    fn test_staff_row_is_member_not_admin() {
        let user = Uuid::new_v4();
        let row = staff(user, StaffRole::Staff, true);
        assert!(row.grants_membership(user));
        assert!(!row.grants_admin(user));
        assert!(!row.grants_membership(Uuid::new_v4()));
    }
}
