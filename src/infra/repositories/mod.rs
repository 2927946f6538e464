//! Repository layer - Data access abstraction
//!
//! Each repository is a trait (mocked in tests) plus a SeaORM-backed store.
//! Per-user resources are always looked up by `(id, user_id)`.

mod bill_repository;
mod donation_repository;
pub(crate) mod entities;
mod medication_repository;
pub(crate) mod pharmacy_repository;
mod reminder_repository;
pub(crate) mod staff_repository;
pub(crate) mod user_repository;

pub use bill_repository::{BillRepository, BillStore};
pub use donation_repository::{DonationRepository, DonationStore};
pub use medication_repository::{MedicationRepository, MedicationStore};
pub use pharmacy_repository::{PharmacyRepository, PharmacyStore};
pub use reminder_repository::{ReminderRepository, ReminderStore};
pub use staff_repository::{StaffRepository, StaffStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use bill_repository::MockBillRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use donation_repository::MockDonationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use medication_repository::MockMedicationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use pharmacy_repository::MockPharmacyRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use reminder_repository::MockReminderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use staff_repository::MockStaffRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
