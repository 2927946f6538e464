//! Service Container - centralized service access.
//!
//! Every service shares one UnitOfWork over the same connection pool.

use std::sync::Arc;

use super::{
    AnalyticsManager, AnalyticsService, AuthService, Authenticator, DonationManager,
    DonationService, MedicationManager, MedicationService, PharmacyManager, PharmacyService,
    ReminderManager, ReminderService, RewardsManager, RewardsService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::{Persistence, UnitOfWork};
use crate::policy::{OwnershipPredicates, PharmacyAccess};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn pharmacies(&self) -> Arc<dyn PharmacyService>;

    fn medications(&self) -> Arc<dyn MedicationService>;

    fn reminders(&self) -> Arc<dyn ReminderService>;

    fn donations(&self) -> Arc<dyn DonationService>;

    fn analytics(&self) -> Arc<dyn AnalyticsService>;

    fn rewards(&self) -> Arc<dyn RewardsService>;

    /// Pharmacy ownership checks used by the authorization layer
    fn ownership(&self) -> Arc<dyn OwnershipPredicates>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth: Arc<dyn AuthService>,
    users: Arc<dyn UserService>,
    pharmacies: Arc<dyn PharmacyService>,
    medications: Arc<dyn MedicationService>,
    reminders: Arc<dyn ReminderService>,
    donations: Arc<dyn DonationService>,
    analytics: Arc<dyn AnalyticsService>,
    rewards: Arc<dyn RewardsService>,
    ownership: Arc<dyn OwnershipPredicates>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        Self::from_unit_of_work(Arc::new(Persistence::new(db)), config)
    }

    pub fn from_unit_of_work<U: UnitOfWork>(uow: Arc<U>, config: Config) -> Self {
        let ownership = Arc::new(PharmacyAccess::new(
            uow.pharmacies(),
            uow.users(),
            uow.staff(),
        ));

        Self {
            auth: Arc::new(Authenticator::new(uow.clone(), config)),
            users: Arc::new(UserManager::new(uow.clone())),
            pharmacies: Arc::new(PharmacyManager::new(uow.clone())),
            medications: Arc::new(MedicationManager::new(uow.clone())),
            reminders: Arc::new(ReminderManager::new(uow.clone())),
            donations: Arc::new(DonationManager::new(uow.clone())),
            analytics: Arc::new(AnalyticsManager::new(uow.clone())),
            rewards: Arc::new(RewardsManager::new(uow)),
            ownership,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    fn pharmacies(&self) -> Arc<dyn PharmacyService> {
        self.pharmacies.clone()
    }

    fn medications(&self) -> Arc<dyn MedicationService> {
        self.medications.clone()
    }

    fn reminders(&self) -> Arc<dyn ReminderService> {
        self.reminders.clone()
    }

    fn donations(&self) -> Arc<dyn DonationService> {
        self.donations.clone()
    }

    fn analytics(&self) -> Arc<dyn AnalyticsService> {
        self.analytics.clone()
    }

    fn rewards(&self) -> Arc<dyn RewardsService> {
        self.rewards.clone()
    }

    fn ownership(&self) -> Arc<dyn OwnershipPredicates> {
        self.ownership.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::services::testing::{fixtures, TestUnitOfWork};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_container_wires_ownership_to_repositories() {
        let owner = Uuid::new_v4();
        let pid = Uuid::new_v4();
        let mut uow = TestUnitOfWork::default();
        uow.pharmacies
            .expect_find_by_id()
            .returning(move |id| Ok(Some(fixtures::pharmacy(id, owner))));
        uow.users
            .expect_find_by_id()
            .returning(|id| Ok(Some(fixtures::user(id, &[Role::Pharmacy]))));
        let services =
            Services::from_unit_of_work(uow.build(), Config::with_secret("x".repeat(32)));

        let owner = fixtures::principal(owner, &[Role::Pharmacy]);
        assert!(services.ownership().is_pharmacy_admin(pid, &owner).await);
    }
}
