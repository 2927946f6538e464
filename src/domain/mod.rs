//! Domain layer - entities, value objects and the pure rules over them.
//!
//! Nothing here touches the database or HTTP. Services load data through
//! repositories and hand it to these types.

pub mod analytics;
pub mod bill;
pub mod donation;
pub mod medication;
pub mod password;
pub mod pharmacy;
pub mod principal;
pub mod reminder;
pub mod rewards;
pub mod role;
pub mod user;

pub use analytics::{
    AdherenceBreakdown, MedicationBreakdown, SalesPeriod, SalesSummary, UserDashboard,
};
pub use bill::{activity_feed, ActivityItem, Bill, NewBill};
pub use donation::{Donation, DonationInput, DonationResponse, DonationStatus, StatusUpdate};
pub use medication::{Medication, MedicationInput};
pub use password::Password;
pub use pharmacy::{
    AddStaff, CreatePharmacy, NewPharmacy, Pharmacy, PharmacyResponse, PharmacyStaff,
    PharmacyUpdate, StaffResponse, StaffUpdate,
};
pub use principal::Principal;
pub use reminder::{CreateReminder, Reminder, ReminderResponse, ReminderWindow, UpdateReminder};
pub use rewards::{Achievement, Level, RewardItem, RewardsDashboard};
pub use role::{Role, StaffRole};
pub use user::{NewUser, ProfileUpdate, User, UserResponse};
