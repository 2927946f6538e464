//! UnitOfWork over mocked repositories for service unit tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{AppError, AppResult};
use crate::infra::{
    BillRepository, DonationRepository, MedicationRepository, MockBillRepository,
    MockDonationRepository, MockMedicationRepository, MockPharmacyRepository,
    MockReminderRepository, MockStaffRepository, MockUserRepository, PharmacyRepository,
    ReminderRepository, StaffRepository, TransactionContext, TxFuture, UnitOfWork,
    UserRepository,
};

/// Repositories default to mocks without expectations; any unexpected call panics.
#[derive(Default)]
pub struct TestUnitOfWork {
    pub users: MockUserRepository,
    pub pharmacies: MockPharmacyRepository,
    pub staff: MockStaffRepository,
    pub medications: MockMedicationRepository,
    pub reminders: MockReminderRepository,
    pub donations: MockDonationRepository,
    pub bills: MockBillRepository,
}

impl TestUnitOfWork {
    pub fn build(self) -> Arc<FrozenUnitOfWork> {
        Arc::new(FrozenUnitOfWork {
            users: Arc::new(self.users),
            pharmacies: Arc::new(self.pharmacies),
            staff: Arc::new(self.staff),
            medications: Arc::new(self.medications),
            reminders: Arc::new(self.reminders),
            donations: Arc::new(self.donations),
            bills: Arc::new(self.bills),
        })
    }
}

pub struct FrozenUnitOfWork {
    users: Arc<MockUserRepository>,
    pharmacies: Arc<MockPharmacyRepository>,
    staff: Arc<MockStaffRepository>,
    medications: Arc<MockMedicationRepository>,
    reminders: Arc<MockReminderRepository>,
    donations: Arc<MockDonationRepository>,
    bills: Arc<MockBillRepository>,
}

#[async_trait]
impl UnitOfWork for FrozenUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn pharmacies(&self) -> Arc<dyn PharmacyRepository> {
        self.pharmacies.clone()
    }

    fn staff(&self) -> Arc<dyn StaffRepository> {
        self.staff.clone()
    }

    fn medications(&self) -> Arc<dyn MedicationRepository> {
        self.medications.clone()
    }

    fn reminders(&self) -> Arc<dyn ReminderRepository> {
        self.reminders.clone()
    }

    fn donations(&self) -> Arc<dyn DonationRepository> {
        self.donations.clone()
    }

    fn bills(&self) -> Arc<dyn BillRepository> {
        self.bills.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        // Transaction not supported in test mock
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

pub mod fixtures {
    use std::collections::BTreeSet;

    use chrono::{NaiveDate, NaiveDateTime, Utc};
    use uuid::Uuid;

    use crate::domain::{
        Donation, DonationStatus, Medication, Pharmacy, PharmacyStaff, Principal, Reminder, Role,
        StaffRole, User,
    };

    pub fn principal(id: Uuid, roles: &[Role]) -> Principal {
        Principal::new(id, "caller@example.com", roles.iter().copied())
    }

    pub fn user(id: Uuid, roles: &[Role]) -> User {
        User {
            id,
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            password_hash: String::new(),
            image_url: None,
            enabled: true,
            roles: roles.iter().copied().collect::<BTreeSet<_>>(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn pharmacy(id: Uuid, owner_id: Uuid) -> Pharmacy {
        Pharmacy {
            id,
            name: "Corner Pharmacy".into(),
            registration_number: "RX-100".into(),
            address: "1 Main St".into(),
            phone: "555-0100".into(),
            email: "corner@example.com".into(),
            website: None,
            owner_id,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn staff(pharmacy_id: Uuid, user_id: Uuid, role: StaffRole, active: bool) -> PharmacyStaff {
        PharmacyStaff {
            id: Uuid::new_v4(),
            pharmacy_id,
            user_id,
            role,
            active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn medication(id: Uuid, user_id: Uuid) -> Medication {
        Medication {
            id,
            user_id,
            name: "Metformin".into(),
            description: None,
            dosage: "500mg".into(),
            frequency: "twice daily".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end_date: None,
            notes: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn reminder(id: Uuid, user_id: Uuid, medication_id: Uuid, at: NaiveDateTime) -> Reminder {
        Reminder {
            id,
            user_id,
            medication_id,
            reminder_time: at,
            notes: None,
            completed: false,
            completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn donation(id: Uuid, user_id: Uuid, status: DonationStatus) -> Donation {
        Donation {
            id,
            user_id,
            medicine_name: "Amoxicillin".into(),
            quantity: 2,
            expiry_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap_or_default(),
            location: "Downtown".into(),
            organization: None,
            notes: None,
            status,
            donation_date: Utc::now(),
            completed_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
