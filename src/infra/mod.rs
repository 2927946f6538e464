//! Infrastructure layer - External systems integration
//!
//! - PostgreSQL connection, migrations and repositories
//! - Redis for rate limiting
//! - Unit of Work for transaction management
//! - Health probes

pub mod cache;
pub mod db;
pub mod health;
pub mod repositories;
pub mod unit_of_work;

pub use cache::{Cache, RateLimiter};
pub use db::{Database, Migrator};
pub use health::HealthCheck;
pub use repositories::{
    BillRepository, DonationRepository, MedicationRepository, PharmacyRepository,
    ReminderRepository, StaffRepository, UserRepository,
};
pub use unit_of_work::{Persistence, TransactionContext, TxFuture, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockRateLimiter;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockBillRepository, MockDonationRepository, MockMedicationRepository,
    MockPharmacyRepository, MockReminderRepository, MockStaffRepository, MockUserRepository,
};
