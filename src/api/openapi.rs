//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    analytics_handler, auth_handler, donation_handler, medication_handler, pharmacy_handler,
    reminder_handler, rewards_handler, user_handler,
};
use crate::domain::{
    Achievement, ActivityItem, AddStaff, AdherenceBreakdown, Bill, CreatePharmacy,
    CreateReminder, DonationInput, DonationResponse, DonationStatus, Level, Medication,
    MedicationBreakdown, MedicationInput, NewBill, PharmacyResponse, PharmacyUpdate,
    ProfileUpdate, ReminderResponse, RewardItem, RewardsDashboard, Role, SalesSummary,
    StaffResponse, StaffRole, StaffUpdate, StatusUpdate, UpdateReminder, UserDashboard,
    UserResponse,
};
use crate::errors::ErrorResponse;
use crate::services::{
    AuthResponse, LoginRequest, PharmacyAuthResponse, PharmacySignupRequest, SignupRequest,
    ValidateResponse, ValidatedIdentity,
};

/// OpenAPI documentation for the PharmaCare API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PharmaCare API",
        version = "0.1.0",
        description = "Medication tracking, reminders, donations and multi-tenant pharmacy management"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // Authentication
        auth_handler::signup,
        auth_handler::login,
        auth_handler::pharmacy_signup,
        auth_handler::pharmacy_login,
        auth_handler::validate,
        // Users
        user_handler::get_current_user,
        user_handler::get_profile,
        user_handler::update_profile,
        // Medications
        medication_handler::list_medications,
        medication_handler::list_active_medications,
        medication_handler::create_medication,
        medication_handler::get_medication,
        medication_handler::update_medication,
        medication_handler::delete_medication,
        // Reminders
        reminder_handler::list_reminders,
        reminder_handler::pending_reminders,
        reminder_handler::create_reminder,
        reminder_handler::get_reminder,
        reminder_handler::update_reminder,
        reminder_handler::delete_reminder,
        reminder_handler::complete_reminder,
        // Donations
        donation_handler::list_donations,
        donation_handler::pending_donations,
        donation_handler::create_donation,
        donation_handler::get_donation,
        donation_handler::update_donation,
        donation_handler::delete_donation,
        donation_handler::update_donation_status,
        // Pharmacies
        pharmacy_handler::list_pharmacies,
        pharmacy_handler::create_pharmacy,
        pharmacy_handler::my_pharmacies,
        pharmacy_handler::get_pharmacy,
        pharmacy_handler::update_pharmacy,
        pharmacy_handler::delete_pharmacy,
        pharmacy_handler::pharmacy_activity,
        pharmacy_handler::list_staff,
        pharmacy_handler::add_staff,
        pharmacy_handler::update_staff,
        pharmacy_handler::list_bills,
        pharmacy_handler::create_bill,
        // Analytics
        analytics_handler::user_dashboard,
        analytics_handler::user_adherence,
        analytics_handler::user_medications,
        analytics_handler::sales_summary,
        // Rewards
        rewards_handler::rewards_dashboard,
        rewards_handler::achievements,
    ),
    components(
        schemas(
            ErrorResponse,
            // Auth types
            SignupRequest,
            LoginRequest,
            PharmacySignupRequest,
            AuthResponse,
            PharmacyAuthResponse,
            ValidateResponse,
            ValidatedIdentity,
            // Accounts
            Role,
            UserResponse,
            ProfileUpdate,
            // Care records
            Medication,
            MedicationInput,
            CreateReminder,
            UpdateReminder,
            ReminderResponse,
            DonationStatus,
            DonationInput,
            DonationResponse,
            StatusUpdate,
            // Pharmacies
            StaffRole,
            CreatePharmacy,
            PharmacyUpdate,
            PharmacyResponse,
            AddStaff,
            StaffUpdate,
            StaffResponse,
            Bill,
            NewBill,
            ActivityItem,
            // Analytics and rewards
            UserDashboard,
            AdherenceBreakdown,
            MedicationBreakdown,
            SalesSummary,
            Level,
            RewardItem,
            RewardsDashboard,
            Achievement,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Patient and pharmacy sign-up and login"),
        (name = "Users", description = "The caller's own account"),
        (name = "Medications", description = "Per-user medication records"),
        (name = "Reminders", description = "Per-user dose reminders"),
        (name = "Donations", description = "Medicine donations and their lifecycle"),
        (name = "Pharmacies", description = "Pharmacy tenants"),
        (name = "Pharmacy Staff", description = "Pharmacy staff rosters"),
        (name = "Pharmacy Billing", description = "Pharmacy sales"),
        (name = "Analytics", description = "Adherence and sales reporting"),
        (name = "Rewards", description = "Points, levels and achievements")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login or /auth/pharmacy/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_protected_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/pharmacies/{id}/staff/{staff_id}"));
        assert!(doc.paths.paths.contains_key("/reminders/{id}/complete"));
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }
}
