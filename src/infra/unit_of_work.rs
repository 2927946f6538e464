//! Unit of Work: central repository access plus transaction management.
//!
//! Compound writes (pharmacy signup, pharmacy creation, adding staff) run
//! through [`UnitOfWork::transaction`] so a failure part-way leaves nothing
//! behind.

use async_trait::async_trait;
use futures::future::BoxFuture;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::{
    pharmacy_repository, staff_repository, user_repository, BillRepository, BillStore,
    DonationRepository, DonationStore, MedicationRepository, MedicationStore, PharmacyRepository,
    PharmacyStore, ReminderRepository, ReminderStore, StaffRepository, StaffStore,
    UserRepository, UserStore,
};
use crate::domain::{NewPharmacy, NewUser, Pharmacy, PharmacyStaff, Role, StaffRole, User};
use crate::errors::{AppError, AppResult};

/// Boxed future returned by transaction closures
pub type TxFuture<'a, T> = BoxFuture<'a, AppResult<T>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic `transaction` method; tests
/// provide their own implementation over mocked repositories.
#[async_trait]
pub trait UnitOfWork: Send + Sync + 'static {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn pharmacies(&self) -> Arc<dyn PharmacyRepository>;

    fn staff(&self) -> Arc<dyn StaffRepository>;

    fn medications(&self) -> Arc<dyn MedicationRepository>;

    fn reminders(&self) -> Arc<dyn ReminderRepository>;

    fn donations(&self) -> Arc<dyn DonationRepository>;

    fn bills(&self) -> Arc<dyn BillRepository>;

    /// Run `f` inside a ReadCommitted transaction.
    ///
    /// Commits on `Ok`, rolls back on `Err`.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository { txn: self.txn }
    }

    pub fn pharmacies(&self) -> TxPharmacyRepository<'_> {
        TxPharmacyRepository { txn: self.txn }
    }

    pub fn staff(&self) -> TxStaffRepository<'_> {
        TxStaffRepository { txn: self.txn }
    }
}

/// SeaORM-backed UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    users: Arc<UserStore>,
    pharmacies: Arc<PharmacyStore>,
    staff: Arc<StaffStore>,
    medications: Arc<MedicationStore>,
    reminders: Arc<ReminderStore>,
    donations: Arc<DonationStore>,
    bills: Arc<BillStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            pharmacies: Arc::new(PharmacyStore::new(db.clone())),
            staff: Arc::new(StaffStore::new(db.clone())),
            medications: Arc::new(MedicationStore::new(db.clone())),
            reminders: Arc::new(ReminderStore::new(db.clone())),
            donations: Arc::new(DonationStore::new(db.clone())),
            bills: Arc::new(BillStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
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

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-bound user operations
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        user_repository::find_by_email(self.txn, email).await
    }

    pub async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        user_repository::exists_by_email(self.txn, email).await
    }

    /// Insert the user and its role rows
    pub async fn create(&self, new_user: NewUser) -> AppResult<User> {
        user_repository::insert(self.txn, new_user).await
    }

    pub async fn grant_role(&self, user_id: Uuid, role: Role) -> AppResult<()> {
        user_repository::grant_role(self.txn, user_id, role).await
    }
}

/// Transaction-bound pharmacy operations
pub struct TxPharmacyRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxPharmacyRepository<'a> {
    pub async fn exists_by_registration_number(&self, registration_number: &str) -> AppResult<bool> {
        pharmacy_repository::exists_by_registration_number(self.txn, registration_number).await
    }

    pub async fn create(&self, new_pharmacy: NewPharmacy) -> AppResult<Pharmacy> {
        pharmacy_repository::insert(self.txn, new_pharmacy).await
    }
}

/// Transaction-bound staff operations
pub struct TxStaffRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxStaffRepository<'a> {
    pub async fn find_by_pharmacy_and_user(
        &self,
        pharmacy_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<PharmacyStaff>> {
        staff_repository::find_by_pharmacy_and_user(self.txn, pharmacy_id, user_id).await
    }

    pub async fn create(
        &self,
        pharmacy_id: Uuid,
        user_id: Uuid,
        role: StaffRole,
    ) -> AppResult<PharmacyStaff> {
        staff_repository::insert(self.txn, pharmacy_id, user_id, role).await
    }

    pub async fn save(&self, staff: PharmacyStaff) -> AppResult<PharmacyStaff> {
        staff_repository::save(self.txn, staff).await
    }
}
