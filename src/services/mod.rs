//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and repositories through the Unit of
//! Work. Every per-user operation takes the caller's `Principal` explicitly.

mod analytics_service;
mod auth_service;
pub mod container;
mod donation_service;
mod medication_service;
mod pharmacy_service;
mod reminder_service;
mod rewards_service;
mod user_service;

#[cfg(test)]
pub(crate) mod testing;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use analytics_service::{AnalyticsManager, AnalyticsService};
pub use auth_service::{
    AuthResponse, AuthService, Authenticator, Claims, LoginRequest, PharmacyAuthResponse,
    PharmacySignupRequest, SignupRequest, ValidateResponse, ValidatedIdentity,
};
pub use donation_service::{DonationManager, DonationService};
pub use medication_service::{MedicationManager, MedicationService};
pub use pharmacy_service::{PharmacyManager, PharmacyService};
pub use reminder_service::{ReminderManager, ReminderService};
pub use rewards_service::{RewardsManager, RewardsService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
